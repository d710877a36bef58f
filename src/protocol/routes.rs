//! Router assembly
//!
//! | Route                         | Handler                     |
//! |-------------------------------|-----------------------------|
//! | `GET /api/list`               | [`handlers::list_assets`]   |
//! | `POST /api/upload`            | [`handlers::upload_assets`] |
//! | `DELETE /api/delete/{name}`   | [`handlers::delete_asset`]  |
//! | `GET /api/file/{name}`        | [`handlers::fetch_asset`]   |
//! | `GET /health`                 | [`handlers::health`]        |
//! | `GET /<mount>/…`              | static files from the root, minus upload temp files |

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::middleware::logging::log_request;
use crate::middleware::static_files::hide_temp_artifacts;
use crate::protocol::handlers;
use crate::protocol::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.store.limits().max_request_bytes();
    let mount = state.store.manifest().mount().to_string();
    let files = Router::new()
        .fallback_service(ServeDir::new(state.store.root()))
        .layer(from_fn(hide_temp_artifacts));

    let api = Router::new()
        .route("/api/list", get(handlers::list_assets))
        .route(
            "/api/upload",
            post(handlers::upload_assets).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/delete/{file_name}", delete(handlers::delete_asset))
        .route("/api/file/{file_name}", get(handlers::fetch_asset))
        .route("/health", get(handlers::health))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api.nest_service(&mount, files)
        .layer(cors)
        .layer(from_fn(log_request))
}
