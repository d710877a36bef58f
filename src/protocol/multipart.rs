//! Multipart ingestion
//!
//! Turns an upload request body into [`UploadItem`]s. Parts without a file
//! name are ignored. Bodies are only buffered up to the per-file limit, and
//! not at all once the batch is full; the store rejects those items later.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use log::warn;

use crate::assets::UploadItem;
use crate::config::UploadLimits;
use crate::error::{ApiError, ErrorKind};

pub async fn read_upload_items(
    multipart: &mut Multipart,
    limits: &UploadLimits,
) -> Result<Vec<UploadItem>, ApiError> {
    let max_bytes = limits.max_file_size_bytes();
    let mut items = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        if items.len() >= limits.max_files_per_upload {
            items.push(UploadItem::skipped(file_name, content_type, 0));
            continue;
        }

        let mut bytes = Vec::new();
        let mut oversized_at = None;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            let seen = (bytes.len() + chunk.len()) as u64;
            if seen > max_bytes {
                oversized_at = Some(seen);
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        items.push(match oversized_at {
            Some(seen) => UploadItem::skipped(file_name, content_type, seen),
            None => UploadItem::new(file_name, content_type, bytes),
        });
    }

    Ok(items)
}

fn multipart_error(err: MultipartError) -> ApiError {
    warn!("Failed to read multipart body: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(ErrorKind::SizeExceeded)
    } else {
        ApiError::new(ErrorKind::MalformedRequest)
    }
}
