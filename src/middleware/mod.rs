//! Server middleware
//!
//! Provides request logging and the static mount guard.

pub mod logging;
pub mod static_files;
