//! Errors for the orbital catalog service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Serialization error")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("Invalid observation year: {0}")]
    InvalidYear(i32),

    #[error("Database connection error: {0}")]
    DatabaseConnectionError(String),

    #[error("Unsupported type {type_name} in column {column}")]
    UnsupportedColumnType { column: String, type_name: String },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

impl CatalogError {
    /// Classify a query-time sqlx error.
    ///
    /// Failures to reach or authenticate against the store become
    /// [`CatalogError::DatabaseConnectionError`], everything else stays a
    /// query error.
    pub fn from_query(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::DatabaseConnectionError(err.to_string()),
            sqlx::Error::Database(ref db) if is_access_denied(db.code().as_deref()) => {
                Self::DatabaseConnectionError(err.to_string())
            }
            other => Self::DatabaseError(other),
        }
    }

    fn status_and_kind(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            Self::DatabaseConnectionError(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "database_unavailable",
                "The data store could not be reached",
            ),
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "query_failed",
                "The data store query failed",
            ),
            Self::UnsupportedColumnType { .. } | Self::SerdeError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encoding_failed",
                "A stored value could not be encoded as JSON",
            ),
            Self::ConfigError(_)
            | Self::ConfigurationError { .. }
            | Self::InvalidYear(_)
            | Self::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        }
    }
}

/// MySQL SQLSTATE 28000: access denied for user
fn is_access_denied(code: Option<&str>) -> bool {
    code == Some("28000")
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, kind, message) = self.status_and_kind();
        error!("Request failed ({}): {:?}", kind, self);

        let body = Json(json!({
            "error": {
                "type": kind,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
