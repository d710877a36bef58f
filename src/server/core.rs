use log::{info, warn};
use tokio::net::TcpListener;

use crate::assets::IconStore;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::protocol::{AppState, app};

pub struct Server {
    listener: TcpListener,
    state: AppState,
    config: ServerConfig,
}

impl Server {
    /// Prepare the store root and bind the listener.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let store = IconStore::from_config(&config);
        store.ensure_root()?;
        info!("Store root directory: {}", store.root().display());

        let addr = config.startup.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", addr);

        Ok(Self {
            listener,
            state: AppState::new(store),
            config,
        })
    }

    /// Serve requests until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        info!(
            "Starting icon store on {} (files under {}, max {} files x {} MB per upload)",
            self.config.startup.listen_addr(),
            self.config.startup.public_mount,
            self.config.limits.max_files_per_upload,
            self.config.limits.max_file_size_mb
        );

        axum::serve(self.listener, app(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
