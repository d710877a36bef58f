pub mod assets;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod utils;

pub use assets::IconStore;
pub use protocol::{AppState, app};
pub use server::Server;
