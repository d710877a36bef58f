//! Icon Store - Entry Point
//!
//! Category-partitioned SVG/PNG asset store served over HTTP.

use log::{error, info};

use icon_store::Server;
use icon_store::config::ServerConfig;
use icon_store::error::ServerError;
use icon_store::utils::logging::setup_logging;

#[tokio::main]
async fn main() {
    setup_logging();

    info!("Launching icon store...");

    if let Err(e) = run().await {
        error!("Icon store failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    let server = Server::new(config).await?;
    server.start().await
}
