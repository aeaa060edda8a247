//! Integration tests for the gateway routes.
//!
//! A stub backend is served on an ephemeral port and the gateway router is
//! driven directly with `tower::ServiceExt::oneshot`. The interesting cases
//! are the fail-soft ones: a broken backend must never surface as an error
//! from a dashboard view, only as fallback data.

#![cfg(feature = "server")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use formsage::server::{build_router, AppState, GatewayConfig};

/// Serve a stub backend on an ephemeral port, returning its base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub backend");
    });
    format!("http://{addr}")
}

fn gateway(backend_url: String) -> Router {
    let config = GatewayConfig {
        backend_url,
        ..GatewayConfig::default()
    };
    let state = Arc::new(AppState::new(config).expect("gateway state"));
    build_router(state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("gateway response");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .expect("gateway response");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn failing_backend() -> Router {
    Router::new().route(
        "/run-sql",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "database unavailable"})),
            )
        }),
    )
}

#[tokio::test]
async fn summary_serves_fallbacks_when_backend_is_down() {
    let backend_url = spawn_backend(failing_backend()).await;
    let (status, body) = get_json(gateway(backend_url), "/api/dashboard/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_documents"]["total"], json!(1284));
    assert_eq!(body["total_documents"]["percentage_change"], json!(24.0));
    assert_eq!(body["avg_confidence"]["total"], json!(89.7));
    assert_eq!(body["avg_processing_time"]["time_change"], json!(-0.3));
}

#[tokio::test]
async fn summary_serves_fallbacks_when_backend_is_unreachable() {
    // Nothing listens here; the connection itself fails.
    let (status, body) = get_json(
        gateway("http://127.0.0.1:9".to_string()),
        "/api/dashboard/summary",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_documents"]["total"], json!(1284));
}

#[tokio::test]
async fn summary_prefers_parsed_backend_data() {
    // The stub answers the document-count and confidence queries with a
    // pandas-style dump and rejects the processing-time query, so the first
    // two cards show live data while the third falls back.
    let backend = Router::new().route(
        "/run-sql",
        post(|Json(body): Json<Value>| async move {
            let query = body["query"].as_str().unwrap_or_default();
            if query.contains("time_change") {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "timeout"})),
                );
            }
            let dump = if query.contains("avg_confidence") {
                " total  current_month  previous_month  percentage_change\n  91.2           92.0            90.1                2.1"
            } else {
                " total  current_month  previous_month  percentage_change\n  1391            102              82               24.4"
            };
            (StatusCode::OK, Json(json!({ "result": dump })))
        }),
    );

    let backend_url = spawn_backend(backend).await;
    let (status, body) = get_json(gateway(backend_url), "/api/dashboard/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_documents"]["total"], json!(1391));
    assert_eq!(body["total_documents"]["percentage_change"], json!(24.4));
    assert_eq!(body["avg_confidence"]["total"], json!(91.2));
    // The failed fetch degrades independently of its siblings.
    assert_eq!(body["avg_processing_time"]["total"], json!(1.8));
}

#[tokio::test]
async fn overview_pivots_live_rows() {
    let backend = Router::new().route(
        "/run-sql",
        post(|Json(body): Json<Value>| async move {
            let query = body["query"].as_str().unwrap_or_default();
            if query.contains("page_label") && query.contains("'Mon'") {
                return Json(json!({"result": [
                    {"month": "Apr", "page_label": "invoice", "confidence": 94.0},
                    {"month": "Apr", "page_label": "receipt", "confidence": 90.0},
                    {"month": "May", "page_label": "invoice", "confidence": 93.0}
                ]}));
            }
            // Everything else is unusable on purpose.
            Json(json!({"result": null}))
        }),
    );

    let backend_url = spawn_backend(backend).await;
    let (status, body) = get_json(gateway(backend_url), "/api/dashboard/overview").await;

    assert_eq!(status, StatusCode::OK);
    let trend = body["confidence_by_type"].as_array().unwrap();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0]["month"], json!("Apr"));
    assert_eq!(trend[0]["invoice"], json!(94.0));
    assert_eq!(trend[0]["receipt"], json!(90.0));
    // The other two datasets fell back to samples.
    assert_eq!(body["volume"].as_array().unwrap().len(), 6);
    assert_eq!(body["field_extraction"][0]["name"], json!("Invoice Number"));
}

#[tokio::test]
async fn metric_proxy_relays_body_and_envelope() {
    let backend = Router::new().route(
        "/run-sql",
        post(|| async { Json(json!({"result": "name value\ninvoice 45"})) }),
    );

    let backend_url = spawn_backend(backend).await;
    let (status, body) = post_json(
        gateway(backend_url),
        "/api/metrics/total-documents",
        json!({"query": "SELECT 1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "name value\ninvoice 45"}));
}

#[tokio::test]
async fn metric_proxy_relays_upstream_errors() {
    let backend_url = spawn_backend(failing_backend()).await;
    let (status, body) = post_json(
        gateway(backend_url),
        "/api/metrics/avg-confidence",
        json!({"query": "SELECT 1"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], json!("UPSTREAM_ERROR"));
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("database unavailable"));
}

#[tokio::test]
async fn unknown_metric_slug_is_404_without_touching_backend() {
    // No backend at all: the slug check happens first.
    let (status, body) = post_json(
        gateway("http://127.0.0.1:9".to_string()),
        "/api/metrics/per-tenant-costs",
        json!({"query": "SELECT 1"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("UNKNOWN_METRIC"));
}

#[tokio::test]
async fn missing_query_is_400() {
    let (status, body) = post_json(
        gateway("http://127.0.0.1:9".to_string()),
        "/api/run-sql",
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));

    let (status, _) = post_json(
        gateway("http://127.0.0.1:9".to_string()),
        "/api/run-sql",
        json!({"query": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn convert_to_sql_relays_generated_query() {
    let backend = Router::new().route(
        "/convert-to-sql",
        post(|| async { Json(json!({"sqlQuery": "SELECT COUNT(*) FROM pages"})) }),
    );

    let backend_url = spawn_backend(backend).await;
    let (status, body) = post_json(
        gateway(backend_url),
        "/api/convert-to-sql",
        json!({"query": "how many documents do we have?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sqlQuery"], json!("SELECT COUNT(*) FROM pages"));
}

#[tokio::test]
async fn probes_answer_without_a_backend() {
    let app = gateway("http://127.0.0.1:9".to_string());
    let (status, body) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = get_json(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ready"));
}
