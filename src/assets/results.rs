//! Asset operation result types
//!
//! Structures returned by the list, upload, delete and fetch operations.

use serde::Serialize;

use crate::error::{ErrorKind, UploadError};
use crate::storage::AssetDescriptor;

/// One file submitted in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Client-supplied file name, untrusted.
    pub file_name: String,
    /// Declared MIME type, if the client sent one.
    pub content_type: Option<String>,
    /// Bytes received. Empty when the ingestion layer stopped reading early.
    pub bytes: Vec<u8>,
    /// Size observed by the ingestion layer; may exceed `bytes.len()`.
    pub size: u64,
}

impl UploadItem {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
            size,
        }
    }

    /// Placeholder for a file whose body was not (fully) read, either because
    /// it exceeded the size limit or the batch was already full.
    pub fn skipped(file_name: impl Into<String>, content_type: Option<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: Vec::new(),
            size,
        }
    }
}

/// An upload item that was not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Name as submitted by the client.
    pub name: String,
    pub kind: ErrorKind,
}

impl Rejection {
    pub fn new(name: &str, err: &UploadError) -> Self {
        Self {
            name: name.to_string(),
            kind: err.kind(),
        }
    }
}

/// Outcome of an upload batch: descriptors of the stored files plus the
/// items that were turned away.
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub files: Vec<AssetDescriptor>,
    pub rejected: Vec<Rejection>,
}

impl UploadReport {
    /// The rejection that answers for the whole batch when nothing was
    /// stored. `None` if at least one file was accepted or none was sent.
    pub fn batch_failure(&self) -> Option<ErrorKind> {
        if self.files.is_empty() {
            self.rejected.first().map(|r| r.kind)
        } else {
            None
        }
    }
}

/// Result of a successful delete.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub ok: bool,
    pub deleted_name: String,
    pub category_found: String,
}

/// File content returned by a fetch.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub name: String,
    pub category: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}
