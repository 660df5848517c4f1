//! Liveness and readiness probe handlers

use crate::{
    health::{LivenessReport, ReadinessReport},
    AppState,
};
use axum::{extract::State, Json};
use tracing::debug;

/// Always 200: if this runs, the process is alive.
pub async fn handle_liveness(State(state): State<AppState>) -> Json<LivenessReport> {
    debug!("GET /health - Liveness probe");
    Json(state.health.liveness())
}

/// Always 200; degradation is reported in the body, never as a 5xx.
pub async fn handle_readiness(State(state): State<AppState>) -> Json<ReadinessReport> {
    debug!("GET /health/ready - Readiness probe");
    Json(state.health.readiness().await)
}
