//! HTTP serving layer: plain JSON over HTTP using axum.

mod config;
mod error;
mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::application::AssessmentService;
use crate::ports::RiskModel;

pub use config::{ServerConfig, BIND_ADDR_ENV, MAX_BATCH_ENV, MODEL_DIR_ENV};
pub use error::ApiError;
pub use routes::{
    BatchEntry, BatchResponse, FailedEntry, HealthResponse, ScoredEntry, FALLBACK_RISK_CATEGORY,
    FALLBACK_RISK_SCORE,
};

/// Shared handler state.
pub struct AppState<M: RiskModel> {
    pub service: Arc<AssessmentService<M>>,
    pub config: Arc<ServerConfig>,
}

impl<M: RiskModel> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
        }
    }
}

/// Build the router with all endpoints.
pub fn router<M: RiskModel + 'static>(
    service: Arc<AssessmentService<M>>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        service,
        config: Arc::new(config),
    };
    Router::new()
        .route("/health", get(routes::health::<M>))
        .route("/predict", post(routes::predict::<M>))
        .route("/batch_predict", post(routes::batch_predict::<M>))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
/// Returns error if the listener cannot bind or the server fails.
pub async fn run<M: RiskModel + 'static>(
    service: Arc<AssessmentService<M>>,
    config: ServerConfig,
) -> crate::Result<()> {
    let addr = config.bind_addr;
    let demo_mode = service.model().is_demo_mode();
    let app = router(service, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Insight Map API listening on {} (demo mode: {})", addr, demo_mode);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
