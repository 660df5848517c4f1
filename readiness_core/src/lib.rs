//! Core library for the liveness/readiness probe service: the check engine, its
//! configuration, and the HTTP handlers exposing it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;

pub use crate::config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use health::{
    aggregate, Check, CheckError, CheckResult, CheckRunner, CheckStatus, DependencyCheck,
    DependencyTarget, EnvironmentCheck, HealthService, HttpPing, LivenessReport,
    LivenessReporter, Ping, ReadinessReport,
};

use axum::Router;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthService>,
}

impl AppState {
    pub fn new(health: HealthService) -> Self {
        Self {
            health: Arc::new(health),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(HealthService::from_config(config)?))
    }

    /// Loads and validates the configuration, then builds the state from it.
    pub fn load() -> Result<(AppConfig, Self)> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<(AppConfig, Self)> {
        let config = AppConfig::load_from(path)?;
        let state = Self::from_config(&config)?;
        Ok((config, state))
    }
}

pub fn create_app(state: AppState) -> Router {
    let router = create_routes().with_state(state);
    middleware::logging::with_request_logging(router)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
