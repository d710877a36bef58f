//! HTTP protocol implementation
//!
//! Routing, request extraction and response shaping for the store API.

pub mod handlers;
pub mod multipart;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;
