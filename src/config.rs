//! Application configuration

use std::net::SocketAddr;
use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{errors::CatalogError, models::ObservationYear};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub listen: String,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub acquire_timeout: Duration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Year of the close approaches and perihelion passages to serve
    pub year: i32,
}

impl AppConfig {
    /// Load from `config/default.*` and `ORBITAL__*` environment variables.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(
                    Environment::with_prefix("ORBITAL")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    /// Apply defaults beneath the given sources, then deserialize and validate.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, CatalogError> {
        let config: Self = builder
            .set_default("server.listen", "0.0.0.0:8080")?
            .set_default("database.url", "mysql://root@localhost/orbitalobjectsdb")?
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout", 5)?
            .set_default("catalog.year", 2024)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        self.server.validate()?;
        self.database.validate()?;
        self.catalog.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Parse the listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, CatalogError> {
        self.listen
            .parse()
            .map_err(|e| CatalogError::ConfigurationError {
                message: format!("Invalid listen address '{}': {}", self.listen, e),
            })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        self.socket_addr().map(|_| ())
    }
}

impl DatabaseConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.validate_url()?;
        self.validate_pool()?;
        Ok(())
    }

    fn validate_url(&self) -> Result<(), CatalogError> {
        if self.url.trim().is_empty() {
            return Err(CatalogError::ConfigurationError {
                message: "Database URL cannot be empty".to_string(),
            });
        }
        if !(self.url.starts_with("mysql://") || self.url.starts_with("mariadb://")) {
            return Err(CatalogError::ConfigurationError {
                message: "Database URL must use the mysql:// or mariadb:// scheme".to_string(),
            });
        }
        Ok(())
    }

    fn validate_pool(&self) -> Result<(), CatalogError> {
        if self.max_connections == 0 {
            return Err(CatalogError::ConfigurationError {
                message: "Max connections must be greater than zero".to_string(),
            });
        }
        if self.acquire_timeout.is_zero() {
            return Err(CatalogError::ConfigurationError {
                message: "Acquire timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl CatalogConfig {
    pub fn observation_year(&self) -> Result<ObservationYear, CatalogError> {
        ObservationYear::try_from(self.year)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        self.observation_year().map(|_| ())
    }
}
