//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

use crate::storage::category::CategoryDir;

/// One regular file found by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    /// `None` when the file's metadata could not be read.
    pub size: Option<u64>,
}

/// Where the locator found a file.
#[derive(Debug, Clone)]
pub struct Located {
    pub dir: CategoryDir,
    pub name: String,
    pub path: PathBuf,
}
