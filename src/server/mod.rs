//! HTTP binding for the generator.
//!
//! # Routes
//!
//! - `GET /api/random?bits=&mode=&extractor=` - random bits with statistics
//! - `GET /health` - liveness probe
//! - `GET /metrics` - Prometheus text format
//!
//! Failures are returned as `{"error": <category>, "detail": <message>}`
//! with a status derived from the category (400, 502 or 503).

mod handlers;

pub use handlers::{status_for, ApiError, ErrorBody, RandomQuery};

use crate::config::ServerConfig;
use crate::generator::QuantumRandomGenerator;
use crate::metrics::MetricsRegistry;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline used to serve requests.
    pub generator: QuantumRandomGenerator,
    /// Request metrics.
    pub metrics: MetricsRegistry,
}

/// Builds the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/api/random", get(handlers::random_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state);

    match cors_layer(config) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// Builds the CORS layer, or `None` when no cross-origin access is
/// configured.
fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    if config.cors_allow_all {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET]),
    )
}

/// HTTP server for the random bit API.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a new server.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Starts the HTTP server.
    ///
    /// Runs until the process receives Ctrl-C.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = router(self.state, &self.config);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            "API server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
