//! The metrics views.
//!
//! Each handler is one dashboard panel. A panel issues its own backend
//! fetches, sequentially and in a fixed order, normalizes every response, and
//! maps it into typed chart rows. Any dataset whose fetch or extraction
//! fails is replaced by its entry in the fallback catalog, independently of
//! its siblings, and the handler still answers 200. Nothing here caches or
//! shares state between requests.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::charts::{
    self, CountStat, DurationStat, FieldRate, PageTimings, ScoreStat, TrendPoint, TypeConfidence,
    TypeSlice, VolumePoint, WideRow,
};
use crate::fallback;
use crate::normalize::{normalize, NormalizedTable};
use crate::queries::Metric;
use crate::server::state::AppState;

/// The three summary cards.
#[derive(Debug, Serialize)]
pub struct SummaryPanel {
    pub total_documents: CountStat,
    pub avg_confidence: ScoreStat,
    pub avg_processing_time: DurationStat,
}

/// The overview tab: confidence trend, volume, field extraction.
#[derive(Debug, Serialize)]
pub struct OverviewPanel {
    pub confidence_by_type: Vec<WideRow>,
    pub volume: Vec<VolumePoint>,
    pub field_extraction: Vec<FieldRate>,
}

/// The document-types tab: distribution pie and per-type confidence.
#[derive(Debug, Serialize)]
pub struct DocumentTypesPanel {
    pub distribution: Vec<TypeSlice>,
    pub confidence_by_type: Vec<TypeConfidence>,
}

/// The processing-time tab: daily trend and page-count buckets.
#[derive(Debug, Serialize)]
pub struct ProcessingTimePanel {
    pub trend: Vec<TrendPoint>,
    pub by_type_and_pages: Vec<PageTimings>,
}

/// `GET /api/dashboard/summary`
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<SummaryPanel> {
    let fb = &fallback::catalog().summary;

    let total_documents = dataset(
        &state,
        Metric::TotalDocuments,
        charts::count_stat,
        &fb.total_documents,
    )
    .await;
    let avg_confidence = dataset(
        &state,
        Metric::AvgConfidence,
        charts::score_stat,
        &fb.avg_confidence,
    )
    .await;
    let avg_processing_time = dataset(
        &state,
        Metric::AvgProcessingTime,
        charts::duration_stat,
        &fb.avg_processing_time,
    )
    .await;

    Json(SummaryPanel {
        total_documents,
        avg_confidence,
        avg_processing_time,
    })
}

/// `GET /api/dashboard/overview`
pub async fn overview(State(state): State<Arc<AppState>>) -> Json<OverviewPanel> {
    let fb = fallback::catalog();

    let confidence_by_type = dataset(
        &state,
        Metric::ConfidenceByTypeOverTime,
        charts::confidence_over_time,
        &fb.confidence_over_time,
    )
    .await;
    let volume = dataset(
        &state,
        Metric::VolumeOverTime,
        charts::volume_over_time,
        &fb.volume_over_time,
    )
    .await;
    let field_extraction = dataset(
        &state,
        Metric::FieldExtractionSuccess,
        charts::field_extraction,
        &fb.field_extraction,
    )
    .await;

    Json(OverviewPanel {
        confidence_by_type,
        volume,
        field_extraction,
    })
}

/// `GET /api/dashboard/document-types`
pub async fn document_types(State(state): State<Arc<AppState>>) -> Json<DocumentTypesPanel> {
    let fb = fallback::catalog();

    let distribution = dataset(
        &state,
        Metric::DocumentTypeDistribution,
        charts::type_distribution,
        &fb.type_distribution,
    )
    .await;
    let confidence_by_type = dataset(
        &state,
        Metric::ConfidenceByType,
        charts::confidence_by_type,
        &fb.confidence_by_type,
    )
    .await;

    Json(DocumentTypesPanel {
        distribution,
        confidence_by_type,
    })
}

/// `GET /api/dashboard/processing-time`
pub async fn processing_time(State(state): State<Arc<AppState>>) -> Json<ProcessingTimePanel> {
    let fb = fallback::catalog();

    let trend = dataset(
        &state,
        Metric::ProcessingTimeTrend,
        charts::processing_trend,
        &fb.processing_trend,
    )
    .await;
    let by_type_and_pages = dataset(
        &state,
        Metric::ProcessingTimeByTypeAndPages,
        charts::page_timings,
        &fb.page_timings,
    )
    .await;

    Json(ProcessingTimePanel {
        trend,
        by_type_and_pages,
    })
}

/// Fetch one metric, normalize, extract; fall back on any failure.
async fn dataset<T, F>(state: &AppState, metric: Metric, extract: F, fallback: &T) -> T
where
    T: Clone,
    F: Fn(&NormalizedTable) -> Option<T>,
{
    let table = match state.backend.run_sql(metric.sql()).await {
        Ok(raw) => normalize(raw),
        Err(err) => {
            tracing::warn!(metric = metric.slug(), error = %err, "metric fetch failed; serving fallback");
            return fallback.clone();
        }
    };

    match extract(&table) {
        Some(value) => value,
        None => {
            tracing::warn!(
                metric = metric.slug(),
                rows = table.len(),
                "metric response unusable; serving fallback"
            );
            fallback.clone()
        }
    }
}
