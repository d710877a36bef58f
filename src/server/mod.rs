//! Server core functionality
//!
//! Binds the listener, prepares the store root and runs the HTTP service.

pub mod core;

pub use self::core::Server;
