//! HTTP handlers for the icon store API.
//!
//! Each handler extracts the category and file parameters, runs the store
//! operation on the blocking pool and maps failures through [`ApiError`].

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Deserialize;

use crate::assets::Rejection;
use crate::error::{ApiError, ErrorKind};
use crate::protocol::multipart::read_upload_items;
use crate::protocol::state::AppState;

/// `?category=` query parameter shared by every route.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// `GET /api/list` - descriptors for one category, or everything.
///
/// Failures answer 500 with an empty array so gallery clients can still
/// render.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    match state
        .with_store(move |store| store.list(query.category.as_deref()))
        .await
    {
        Ok(assets) => Json(assets).into_response(),
        Err(e) => {
            error!("Failed to list assets: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<()>::new())).into_response()
        }
    }
}

/// Response header listing the items of an upload batch that were not
/// stored, as `name=KIND` pairs with percent-encoded names.
pub const REJECTED_FILES_HEADER: &str = "x-rejected-files";

/// `POST /api/upload` - store every file part of a multipart body.
///
/// Answers with the descriptors of the stored files. Rejected items are
/// listed in [`REJECTED_FILES_HEADER`]; when nothing was stored the first
/// rejection becomes the error of the whole request.
pub async fn upload_assets(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let items = read_upload_items(&mut multipart, state.store.limits()).await?;

    let report = state
        .with_store(move |store| store.upload(query.category.as_deref(), items))
        .await
        .map_err(|e| ApiError::from_storage(e, ErrorKind::UploadFailed))?;

    if let Some(kind) = report.batch_failure() {
        return Err(ApiError::new(kind));
    }

    let mut response = Json(report.files).into_response();
    if let Some(value) = rejected_header(&report.rejected) {
        response.headers_mut().insert(REJECTED_FILES_HEADER, value);
    }
    Ok(response)
}

fn rejected_header(rejected: &[Rejection]) -> Option<HeaderValue> {
    if rejected.is_empty() {
        return None;
    }
    let value = rejected
        .iter()
        .map(|r| format!("{}={}", urlencoding::encode(&r.name), r.kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&value).ok()
}

/// `DELETE /api/delete/{file_name}` - delete, searching all categories when
/// none is given.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Result<Response, ApiError> {
    let outcome = state
        .with_store(move |store| store.delete(&file_name, query.category.as_deref()))
        .await
        .map_err(|e| ApiError::from_storage(e, ErrorKind::DeleteFailed))?;

    Ok(Json(outcome).into_response())
}

/// `GET /api/file/{file_name}` - raw content with its inferred type.
pub async fn fetch_asset(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Result<Response, ApiError> {
    let asset = state
        .with_store(move |store| store.fetch(&file_name, query.category.as_deref()))
        .await
        .map_err(|e| ApiError::from_storage(e, ErrorKind::ReadFailed))?;

    Ok(([(header::CONTENT_TYPE, asset.mime_type)], asset.bytes).into_response())
}

pub async fn health() -> &'static str {
    "ok"
}
