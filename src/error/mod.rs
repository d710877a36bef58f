//! Error handling
//!
//! Defines error types and their HTTP mapping for the icon store.

pub mod handlers;
pub mod types;

pub use handlers::ApiError;
pub use types::*;
