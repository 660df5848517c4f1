//! Route table for the probe endpoints

use super::health::{handle_liveness, handle_readiness};
use crate::{error::AppError, AppState};
use axum::{http::Uri, routing::get, Router};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_liveness))
        .route("/health/ready", get(handle_readiness))
        .fallback(handle_not_found)
}

async fn handle_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
