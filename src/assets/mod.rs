//! Asset operations
//!
//! List, upload, delete and fetch built on top of the storage layer.

pub mod operations;
pub mod results;

pub use operations::IconStore;
pub use results::{DeleteOutcome, FetchedAsset, Rejection, UploadItem, UploadReport};
