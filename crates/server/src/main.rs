//! Storefront HTTP server.
//!
//! Configuration comes from the environment (see `ServerConfig::from_env`).
//! The recommendation service must be reachable at `RECOMMENDER_URL` for the
//! home view to work; everything else runs from the fixtures alone.

use anyhow::Result;
use tracing::info;

use server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,server=debug")),
        )
        .init();

    info!("Starting storefront server");

    let config = ServerConfig::from_env()?;
    server::run(config).await
}
