//! Static file guard
//!
//! Keeps in-flight upload temp files out of the static mount.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::debug;

use crate::storage::filesystem::is_temp_artifact;

/// Answer 404 for any request whose last path segment names an upload temp
/// file; pass everything else through.
pub async fn hide_temp_artifacts(request: Request, next: Next) -> Response {
    let last = request.uri().path().rsplit('/').next().unwrap_or_default();
    let last = urlencoding::decode(last)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| last.to_string());

    if is_temp_artifact(&last) {
        debug!("Hiding temp file {} from static mount", last);
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}
