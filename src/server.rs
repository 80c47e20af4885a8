//! HTTP surface of the catalog

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    database::CatalogStore,
    errors::CatalogError,
    models::{AsteroidRecord, CometRecord, CometsResponse, ObservationYear},
};

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub year: ObservationYear,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, year: ObservationYear) -> Self {
        Self { store, year }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Build the router with all catalog routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/asteroids", get(list_asteroids))
        .route("/comets", get(list_comets))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// All asteroid rows of the observation year, as stored
pub async fn list_asteroids(
    State(state): State<AppState>,
) -> Result<Json<Vec<AsteroidRecord>>, CatalogError> {
    let asteroids = state.store.fetch_asteroids(state.year).await?;
    info!("Serving {} asteroids", asteroids.len());
    Ok(Json(asteroids))
}

/// Comets of the observation year, normalized and wrapped under `comets`
pub async fn list_comets(
    State(state): State<AppState>,
) -> Result<Json<CometsResponse>, CatalogError> {
    let year = state.year;
    let comets: Vec<CometRecord> = state
        .store
        .fetch_comets(year)
        .await?
        .into_iter()
        .filter(|comet| {
            let keep = year.matches_calendar_text(&comet.tp_cal);
            if !keep {
                debug!(
                    "Skipping comet {:?}: tp_cal {:?} does not mention {}",
                    comet.name,
                    comet.tp_cal,
                    year.value()
                );
            }
            keep
        })
        .map(CometRecord::normalized)
        .collect();

    info!("Serving {} comets", comets.len());
    Ok(Json(CometsResponse { comets }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, CatalogError> {
    state.store.ping().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}

/// Serve until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), CatalogError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Received shutdown signal");
}
