use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::client::ClientError;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway error types.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Backend error: {message}")]
    Upstream { status: u16, message: String },

    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

impl GatewayError {
    /// HTTP status for this error. Upstream application errors relay the
    /// backend's own status so the proxy stays transparent.
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnknownMetric(_) | GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) | GatewayError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "BAD_REQUEST",
            GatewayError::UnknownMetric(_) => "UNKNOWN_METRIC",
            GatewayError::Upstream { .. } => "UPSTREAM_ERROR",
            GatewayError::BackendUnreachable(_) => "BACKEND_UNREACHABLE",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, message } => GatewayError::Upstream { status, message },
            ClientError::Transport(err) => GatewayError::BackendUnreachable(err.to_string()),
            ClientError::Decode(err) => GatewayError::BackendUnreachable(format!(
                "backend returned an undecodable body: {err}"
            )),
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Internal(format!("IO error: {err}"))
    }
}
