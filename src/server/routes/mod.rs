//! API route handlers.
//!
//! Routes are organized by functionality:
//!
//! - `health`: liveness and readiness probes
//! - `proxy`: pass-through routes forwarding query bodies to the backend
//! - `dashboard`: the metrics views (fetch, normalize, extract, fall back)

pub mod dashboard;
pub mod health;
pub mod proxy;

use crate::server::error::{GatewayError, GatewayResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info.
///
/// Root endpoint (GET /); lists the available endpoints.
pub async fn api_info() -> GatewayResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "FormSage Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/metrics/{metric}",
            "/api/run-sql",
            "/api/convert-to-sql",
            "/api/dashboard/summary",
            "/api/dashboard/overview",
            "/api/dashboard/document-types",
            "/api/dashboard/processing-time",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler for undefined routes.
pub async fn not_found() -> GatewayError {
    GatewayError::NotFound
}
