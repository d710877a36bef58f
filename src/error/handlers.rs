//! Error handlers
//!
//! Maps error kinds to HTTP status codes and JSON error bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;

use crate::error::types::{ErrorKind, StorageError};

/// Body of every error response: `{"error": "NOT_FOUND"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Convert an error kind to its HTTP status code
pub fn error_to_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidName | ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
        ErrorKind::TypeNotAllowed => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::SizeExceeded | ErrorKind::CountExceeded => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::UploadFailed | ErrorKind::DeleteFailed | ErrorKind::ReadFailed => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
}

impl ApiError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Wrap a storage error raised by an operation whose I/O failures are
    /// reported as `io_kind`.
    pub fn from_storage(err: StorageError, io_kind: ErrorKind) -> Self {
        let kind = err.kind_or(io_kind);
        if error_to_status(kind).is_server_error() {
            error!("Icon store error: {}", err);
        }
        Self { kind }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind.as_str(),
        };
        (error_to_status(self.kind), Json(body)).into_response()
    }
}
