//! Error types
//!
//! Defines domain-specific error types for each layer of the icon store.

use std::io;

use thiserror::Error;

/// Machine-readable error kinds reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidName,
    TypeNotAllowed,
    SizeExceeded,
    CountExceeded,
    NotFound,
    UploadFailed,
    DeleteFailed,
    ReadFailed,
    MalformedRequest,
}

impl ErrorKind {
    /// Wire code, e.g. `"NOT_FOUND"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidName => "INVALID_NAME",
            ErrorKind::TypeNotAllowed => "TYPE_NOT_ALLOWED",
            ErrorKind::SizeExceeded => "SIZE_EXCEEDED",
            ErrorKind::CountExceeded => "COUNT_EXCEEDED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::UploadFailed => "UPLOAD_FAILED",
            ErrorKind::DeleteFailed => "DELETE_FAILED",
            ErrorKind::ReadFailed => "READ_FAILED",
            ErrorKind::MalformedRequest => "MALFORMED_REQUEST",
        }
    }
}

/// Storage module errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to write {name}: {source}")]
    WriteFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {name}: {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete {name}: {source}")]
    DeleteFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl StorageError {
    /// Kind of this error, with I/O failures reported as `io_kind`.
    ///
    /// Whether a failed syscall is an upload or a delete failure depends on
    /// the operation that hit it, so the caller supplies that.
    pub fn kind_or(&self, io_kind: ErrorKind) -> ErrorKind {
        match self {
            StorageError::InvalidName(_) => ErrorKind::InvalidName,
            StorageError::NotFound(_) => ErrorKind::NotFound,
            _ => io_kind,
        }
    }
}

/// Per-item upload rejections. None of these abort the rest of a batch.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("file type not allowed: {name}")]
    TypeNotAllowed { name: String },

    #[error("{name} is {size} bytes, limit is {limit}")]
    SizeExceeded { name: String, size: u64, limit: u64 },

    #[error("{name} exceeds the batch limit of {limit} files")]
    CountExceeded { name: String, limit: usize },
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::InvalidName(_) => ErrorKind::InvalidName,
            UploadError::TypeNotAllowed { .. } => ErrorKind::TypeNotAllowed,
            UploadError::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            UploadError::CountExceeded { .. } => ErrorKind::CountExceeded,
        }
    }
}

/// Startup failures of the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
