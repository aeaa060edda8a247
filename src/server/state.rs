use std::sync::Arc;

use crate::client::BackendClient;
use crate::server::config::GatewayConfig;
use crate::server::error::{GatewayError, GatewayResult};

/// Shared application state.
///
/// No shared mutable data lives here: every request fetches,
/// normalizes, and responds in isolation, and only the client's connection
/// pool is reused across requests.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration
    pub config: Arc<GatewayConfig>,

    /// Client for the external document backend (shared pool)
    pub backend: BackendClient,
}

impl AppState {
    /// Create new application state from configuration.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let backend = BackendClient::new(&config.backend_url, config.upstream_timeout())
            .map_err(|e| GatewayError::Config(format!("backend client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }
}

/// Gateway metadata for probe responses.
#[derive(Debug, serde::Serialize)]
pub struct GatewayMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
