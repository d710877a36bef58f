//! Shared handler state

use std::sync::Arc;

use crate::assets::IconStore;
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<IconStore>,
}

impl AppState {
    pub fn new(store: IconStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Run a store operation on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&IconStore) -> Result<T, StorageError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }
}
