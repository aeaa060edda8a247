//! Placeholder datasets for the fail-soft policy.
//!
//! When a metric fetch fails (upstream down, non-2xx, or a response no
//! extractor can use) the dashboard shows these sample values instead of an
//! error state. They live in one catalog rather than scattered per view so
//! the substitution set is auditable in a single place.
//!
//! The values are demonstration data sized like a
//! document-extraction workload. They are not synthesized from real metrics.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::charts::{
    CountStat, DurationStat, FieldRate, PageTimings, ScoreStat, TrendPoint, TypeConfidence,
    TypeSlice, VolumePoint, WideRow,
};

/// The three summary-card placeholders.
#[derive(Debug, Clone)]
pub struct SummaryFallback {
    pub total_documents: CountStat,
    pub avg_confidence: ScoreStat,
    pub avg_processing_time: DurationStat,
}

/// Every placeholder dataset the dashboard can substitute.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    pub summary: SummaryFallback,
    pub confidence_over_time: Vec<WideRow>,
    pub volume_over_time: Vec<VolumePoint>,
    pub field_extraction: Vec<FieldRate>,
    pub type_distribution: Vec<TypeSlice>,
    pub confidence_by_type: Vec<TypeConfidence>,
    pub processing_trend: Vec<TrendPoint>,
    pub page_timings: Vec<PageTimings>,
}

/// The shared catalog instance.
pub fn catalog() -> &'static FallbackCatalog {
    &CATALOG
}

static CATALOG: Lazy<FallbackCatalog> = Lazy::new(|| FallbackCatalog {
    summary: SummaryFallback {
        total_documents: CountStat {
            total: 1284,
            percentage_change: 24.0,
        },
        avg_confidence: ScoreStat {
            total: 89.7,
            percentage_change: 2.3,
        },
        avg_processing_time: DurationStat {
            total: 1.8,
            time_change: -0.3,
        },
    },
    confidence_over_time: vec![
        confidence_row("Jan", 92, 88, 85),
        confidence_row("Feb", 93, 87, 86),
        confidence_row("Mar", 91, 89, 84),
        confidence_row("Apr", 94, 90, 87),
        confidence_row("May", 93, 91, 88),
        confidence_row("Jun", 95, 92, 89),
    ],
    volume_over_time: vec![
        volume("Jan", 120),
        volume("Feb", 150),
        volume("Mar", 180),
        volume("Apr", 220),
        volume("May", 270),
        volume("Jun", 310),
    ],
    field_extraction: vec![
        rate("Invoice Number", 98.0, 2.0),
        rate("Date", 97.0, 3.0),
        rate("Customer", 92.0, 8.0),
        rate("Amount", 95.0, 5.0),
        rate("Tax", 91.0, 9.0),
        rate("Total", 96.0, 4.0),
    ],
    type_distribution: vec![
        slice("Invoices", 45),
        slice("Receipts", 30),
        slice("Forms", 15),
        slice("Other", 10),
    ],
    confidence_by_type: vec![
        type_confidence("Invoices", 94.0),
        type_confidence("Receipts", 91.0),
        type_confidence("Forms", 87.0),
        type_confidence("Other", 82.0),
    ],
    processing_trend: vec![
        trend("2023-06-01", 2.1),
        trend("2023-06-02", 2.0),
        trend("2023-06-03", 1.9),
        trend("2023-06-04", 2.2),
        trend("2023-06-05", 1.8),
        trend("2023-06-06", 1.7),
        trend("2023-06-07", 1.6),
        trend("2023-06-08", 1.7),
        trend("2023-06-09", 1.5),
        trend("2023-06-10", 1.6),
        trend("2023-06-11", 1.4),
        trend("2023-06-12", 1.5),
        trend("2023-06-13", 1.3),
        trend("2023-06-14", 1.4),
    ],
    page_timings: vec![
        timings("Invoices", 1.2, 1.8, 2.5),
        timings("Receipts", 1.0, 1.5, 2.2),
        timings("Forms", 1.4, 2.0, 2.8),
        timings("Other", 1.6, 2.3, 3.1),
    ],
});

fn confidence_row(month: &str, invoices: u64, receipts: u64, forms: u64) -> WideRow {
    let mut row = WideRow::new();
    row.insert("month".to_string(), Value::String(month.to_string()));
    row.insert("invoices".to_string(), Value::from(invoices));
    row.insert("receipts".to_string(), Value::from(receipts));
    row.insert("forms".to_string(), Value::from(forms));
    row
}

fn volume(month: &str, count: u64) -> VolumePoint {
    VolumePoint {
        month: month.to_string(),
        count,
    }
}

fn rate(name: &str, success: f64, failure: f64) -> FieldRate {
    FieldRate {
        name: name.to_string(),
        success,
        failure,
    }
}

fn slice(name: &str, value: u64) -> TypeSlice {
    TypeSlice {
        name: name.to_string(),
        value,
    }
}

fn type_confidence(label: &str, confidence: f64) -> TypeConfidence {
    TypeConfidence {
        label: label.to_string(),
        confidence,
    }
}

fn trend(date: &str, time: f64) -> TrendPoint {
    TrendPoint {
        date: date.to_string(),
        time,
    }
}

fn timings(label: &str, pages1: f64, pages2: f64, pages3_plus: f64) -> PageTimings {
    PageTimings {
        label: label.to_string(),
        pages1: Some(pages1),
        pages2: Some(pages2),
        pages3_plus: Some(pages3_plus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_placeholders_match_documented_values() {
        let fb = catalog();
        assert_eq!(fb.summary.total_documents.total, 1284);
        assert_eq!(fb.summary.avg_confidence.total, 89.7);
        assert_eq!(fb.summary.avg_processing_time.time_change, -0.3);
    }

    #[test]
    fn datasets_are_populated() {
        let fb = catalog();
        assert_eq!(fb.confidence_over_time.len(), 6);
        assert_eq!(fb.volume_over_time.len(), 6);
        assert_eq!(fb.field_extraction.len(), 6);
        assert_eq!(fb.type_distribution.len(), 4);
        assert_eq!(fb.processing_trend.len(), 14);
        assert_eq!(fb.page_timings.len(), 4);
    }

    #[test]
    fn wide_rows_lead_with_the_month_column() {
        let first = &catalog().confidence_over_time[0];
        assert_eq!(first.keys().next().map(String::as_str), Some("month"));
    }
}
