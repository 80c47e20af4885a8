//! Orbital catalog server

use std::sync::Arc;

use orbital_catalog::{
    config::AppConfig,
    database::{CatalogStore, Database},
    errors::CatalogError,
    server::{self, AppState},
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), CatalogError> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration, preferring environment variables and config files
    let config = AppConfig::load()?;
    let addr = config.server.socket_addr()?;
    let year = config.catalog.observation_year()?;

    let db = Database::connect_lazy(&config.database)?;

    // Unreachable store is not fatal, requests report it individually
    match db.ping().await {
        Ok(()) => info!("Database reachable"),
        Err(e) => warn!("Database not reachable at startup: {}", e),
    }

    info!("Serving catalog for year {}", year.value());
    server::serve(addr, AppState::new(Arc::new(db), year)).await
}
