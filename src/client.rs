//! HTTP client for the external document backend.
//!
//! The backend is a separate service reached over HTTP; this module owns the
//! wire boundary. Responses are decoded directly into [`RawResponse`] so the
//! shape classification of [`crate::normalize`] happens exactly once, at
//! decode time.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::normalize::RawResponse;

/// Errors from talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The 2xx body was not valid JSON.
    #[error("backend response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the backend's query and conversion endpoints.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SqlConversion {
    #[serde(rename = "sqlQuery")]
    sql_query: String,
}

impl BackendClient {
    /// Build a client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(8)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a SQL query via `POST /run-sql` and decode the body into the
    /// response union. The body shape is not contractually fixed upstream;
    /// callers normalize it before use.
    pub async fn run_sql(&self, query: &str) -> Result<RawResponse, ClientError> {
        self.post_query("run-sql", query).await
    }

    /// Convert a natural-language prompt to SQL via `POST /convert-to-sql`.
    pub async fn convert_to_sql(&self, prompt: &str) -> Result<String, ClientError> {
        let body = self.post_raw("convert-to-sql", prompt).await?;
        let conversion: SqlConversion = serde_json::from_str(&body)?;
        Ok(conversion.sql_query)
    }

    async fn post_query(&self, endpoint: &str, query: &str) -> Result<RawResponse, ClientError> {
        let body = self.post_raw(endpoint, query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_raw(&self, endpoint: &str, query: &str) -> Result<String, ClientError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "backend rejected query");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }
        Ok(body)
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// The backend reports `{"detail": ...}` (FastAPI) while older deployments
/// used `{"error": ...}`; fall back to the raw body when neither fits.
fn upstream_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        detail: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.error.or(parsed.detail) {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        "no error detail provided".to_string()
    } else {
        body.to_string()
    }
}
