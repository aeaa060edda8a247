use crate::server::error::GatewayResult;
use crate::server::state::{AppState, GatewayMetadata};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Health check endpoint (liveness).
/// Returns 200 if the gateway is running.
pub async fn health_check() -> impl IntoResponse {
    let uptime = SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(json!({
        "status": "healthy",
        "service": "formsage-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime,
    }))
}

/// Readiness check endpoint.
///
/// The gateway has no local dependencies to wait for; readiness reports the
/// configured backend so operators can see where queries will go. A down
/// backend does not make the gateway unready; views degrade to fallbacks.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> GatewayResult<impl IntoResponse> {
    let uptime = SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(Json(json!({
        "status": "ready",
        "service": "formsage-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime,
        "components": {
            "api": "ready",
            "backend": state.backend.base_url(),
        }
    })))
}

/// Gateway metadata endpoint.
pub async fn metadata() -> GatewayResult<impl IntoResponse> {
    let uptime = SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let metadata = GatewayMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    };

    Ok(Json(serde_json::to_value(metadata).map_err(|e| {
        crate::server::error::GatewayError::Internal(e.to_string())
    })?))
}
