//! The HTTP gateway.
//!
//! This module wires the axum service: router construction, middleware
//! stack (request IDs, logging, timeout, compression, CORS), and graceful
//! shutdown. Views and proxies live under [`routes`]; the upstream client
//! and the normalization core are crate-level modules shared with
//! library-only consumers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use state::AppState;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::server::middleware::{log_requests, request_id};
use crate::server::routes::{api_info, dashboard, health, not_found, proxy};

/// Build the axum router with all routes and middleware.
///
/// There is no authentication layer: the gateway fronts a read-mostly
/// dashboard and trusts its network boundary, like the front end it
/// replaces.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let timeout = Duration::from_secs(state.config.timeout_secs);

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/api/metadata", get(health::metadata))
        // Pass-through proxies
        .route("/api/metrics/{metric}", post(proxy::metric_proxy))
        .route("/api/run-sql", post(proxy::run_sql))
        .route("/api/convert-to-sql", post(proxy::convert_to_sql))
        // Dashboard views
        .route("/api/dashboard/summary", get(dashboard::summary))
        .route("/api/dashboard/overview", get(dashboard::overview))
        .route("/api/dashboard/document-types", get(dashboard::document_types))
        .route("/api/dashboard/processing-time", get(dashboard::processing_time))
        .fallback(not_found)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway.
///
/// Initializes structured logging, builds the shared state and router,
/// binds the configured address, and serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: GatewayConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_target(false)
        .json()
        .init();

    let addr: SocketAddr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config)?);

    tracing::info!(
        "Starting FormSage gateway on {} (backend: {})",
        addr,
        state.backend.base_url()
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
