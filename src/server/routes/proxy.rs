//! Pass-through routes.
//!
//! These forward a `{ "query": ... }` body to the external backend and relay
//! its response, body and status, without interpretation. The front end's
//! metric cards call the named `/api/metrics/{metric}` variants; the chat
//! assistant uses `/api/run-sql` and `/api/convert-to-sql` directly.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::queries::Metric;
use crate::server::error::{GatewayError, GatewayResult};
use crate::server::state::AppState;

/// Body accepted by every proxy route.
#[derive(Debug, Deserialize)]
pub struct QueryBody {
    /// SQL text (or a natural-language prompt for `/api/convert-to-sql`).
    #[serde(default)]
    pub query: Option<String>,
}

/// `POST /api/metrics/{metric}`: forward a metric query to the backend's
/// `/run-sql`. The slug must name a known metric; the query itself still
/// comes from the request body, matching the front-end contract.
pub async fn metric_proxy(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(body): Json<QueryBody>,
) -> GatewayResult<impl IntoResponse> {
    let metric = Metric::from_slug(&slug).ok_or(GatewayError::UnknownMetric(slug))?;
    let query = require_query(body)?;

    tracing::debug!(metric = metric.slug(), "proxying metric query");
    let raw = state.backend.run_sql(&query).await?;
    Ok(Json(raw))
}

/// `POST /api/run-sql`: forward an arbitrary SQL query to the backend.
pub async fn run_sql(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> GatewayResult<impl IntoResponse> {
    let query = require_query(body)?;
    let raw = state.backend.run_sql(&query).await?;
    Ok(Json(raw))
}

/// `POST /api/convert-to-sql`: forward a natural-language prompt and relay
/// the generated SQL.
pub async fn convert_to_sql(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> GatewayResult<impl IntoResponse> {
    let prompt = require_query(body)?;
    let sql_query = state.backend.convert_to_sql(&prompt).await?;
    Ok(Json(json!({ "sqlQuery": sql_query })))
}

fn require_query(body: QueryBody) -> GatewayResult<String> {
    match body.query {
        Some(query) if !query.trim().is_empty() => Ok(query),
        _ => Err(GatewayError::BadRequest("Query is required".to_string())),
    }
}
