// src/database.rs
mod models;
mod types;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

use crate::{
    config::DatabaseConfig,
    errors::CatalogError,
    models::{AsteroidRecord, CometRecord, ObservationYear},
};
use models::CometRow;

const ASTEROIDS_QUERY: &str = "SELECT * FROM asteroids WHERE tp_cal >= ? AND tp_cal < ?";

const COMETS_QUERY: &str = "SELECT name AS name, diameter AS diameter, \
     eccentricity AS eccentricity, inclination AS inclination, \
     perihelion AS perihelion, M1 AS M1, Q AS Q, n AS n, tp_cal AS tp_cal \
     FROM comets WHERE tp_cal LIKE ?";

/// Read access to the orbital object catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Asteroids whose close approach date falls in `year`, rows as stored.
    async fn fetch_asteroids(
        &self,
        year: ObservationYear,
    ) -> Result<Vec<AsteroidRecord>, CatalogError>;

    /// Comets whose perihelion calendar text mentions `year`, in result order.
    ///
    /// Records carry coerced values but are not normalized.
    async fn fetch_comets(&self, year: ObservationYear) -> Result<Vec<CometRecord>, CatalogError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), CatalogError>;
}

/// MySQL-backed catalog
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a pool without opening connections.
    ///
    /// Connections are opened on first use, so an unreachable store surfaces
    /// as a per-request error instead of preventing startup.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, CatalogError> {
        config.validate()?;

        info!(
            "Initializing database pool: max_connections={}, acquire_timeout={:?}",
            config.max_connections, config.acquire_timeout
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)
            .map_err(|e| CatalogError::ConfigurationError {
                message: format!("Invalid database URL: {}", e),
            })?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogStore for Database {
    async fn fetch_asteroids(
        &self,
        year: ObservationYear,
    ) -> Result<Vec<AsteroidRecord>, CatalogError> {
        let rows = sqlx::query(ASTEROIDS_QUERY)
            .bind(year.first_day())
            .bind(year.end_exclusive())
            .fetch_all(&self.pool)
            .await
            .map_err(CatalogError::from_query)?;

        debug!("Fetched {} asteroid rows for {}", rows.len(), year.value());

        rows.iter()
            .map(|row| types::row_to_json(row).map(AsteroidRecord::from))
            .collect()
    }

    async fn fetch_comets(&self, year: ObservationYear) -> Result<Vec<CometRecord>, CatalogError> {
        let rows: Vec<CometRow> = sqlx::query_as(COMETS_QUERY)
            .bind(year.like_pattern())
            .fetch_all(&self.pool)
            .await
            .map_err(CatalogError::from_query)?;

        debug!("Fetched {} comet rows for {}", rows.len(), year.value());

        Ok(rows.into_iter().map(CometRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(CatalogError::from_query)?;
        Ok(())
    }
}
