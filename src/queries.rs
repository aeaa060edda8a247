//! The metric query catalog.
//!
//! Every number on the dashboard comes from one of these canned SQL queries,
//! executed by the external backend's `/run-sql` endpoint. The catalog is the
//! single source of truth for metric slugs (the proxy route names) and their
//! SQL text. The SQL targets the backend's `pages` / `extracted2` tables and
//! is part of the upstream contract; edit with care.

/// A named dashboard metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Distinct documents processed, with month-over-month change.
    TotalDocuments,
    /// Mean page confidence, with month-over-month change.
    AvgConfidence,
    /// Mean per-page processing time, with month-over-month change.
    AvgProcessingTime,
    /// Monthly mean confidence per document type, last six months.
    ConfidenceByTypeOverTime,
    /// Monthly distinct-document counts, last six months.
    VolumeOverTime,
    /// Extraction success/failure rate for the six most-attempted fields.
    FieldExtractionSuccess,
    /// Page counts grouped by document type.
    DocumentTypeDistribution,
    /// Mean confidence grouped by document type.
    ConfidenceByType,
    /// Daily mean processing time, last fourteen days.
    ProcessingTimeTrend,
    /// Mean processing time per document type, bucketed by page number.
    ProcessingTimeByTypeAndPages,
}

impl Metric {
    /// Every metric, in dashboard display order.
    pub const ALL: [Metric; 10] = [
        Metric::TotalDocuments,
        Metric::AvgConfidence,
        Metric::AvgProcessingTime,
        Metric::ConfidenceByTypeOverTime,
        Metric::VolumeOverTime,
        Metric::FieldExtractionSuccess,
        Metric::DocumentTypeDistribution,
        Metric::ConfidenceByType,
        Metric::ProcessingTimeTrend,
        Metric::ProcessingTimeByTypeAndPages,
    ];

    /// The route slug used by the `/api/metrics/{metric}` proxies.
    pub fn slug(&self) -> &'static str {
        match self {
            Metric::TotalDocuments => "total-documents",
            Metric::AvgConfidence => "avg-confidence",
            Metric::AvgProcessingTime => "avg-processing-time",
            Metric::ConfidenceByTypeOverTime => "confidence-by-type-over-time",
            Metric::VolumeOverTime => "volume-over-time",
            Metric::FieldExtractionSuccess => "field-extraction-success",
            Metric::DocumentTypeDistribution => "document-type-distribution",
            Metric::ConfidenceByType => "confidence-by-type",
            Metric::ProcessingTimeTrend => "processing-time-trend",
            Metric::ProcessingTimeByTypeAndPages => "processing-time-by-type-and-pages",
        }
    }

    /// Resolve a route slug back to its metric. Unknown slugs are the
    /// caller's 404.
    pub fn from_slug(slug: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.slug() == slug)
    }

    /// The SQL text sent upstream for this metric.
    pub fn sql(&self) -> &'static str {
        match self {
            Metric::TotalDocuments => TOTAL_DOCUMENTS_SQL,
            Metric::AvgConfidence => AVG_CONFIDENCE_SQL,
            Metric::AvgProcessingTime => AVG_PROCESSING_TIME_SQL,
            Metric::ConfidenceByTypeOverTime => CONFIDENCE_BY_TYPE_OVER_TIME_SQL,
            Metric::VolumeOverTime => VOLUME_OVER_TIME_SQL,
            Metric::FieldExtractionSuccess => FIELD_EXTRACTION_SUCCESS_SQL,
            Metric::DocumentTypeDistribution => DOCUMENT_TYPE_DISTRIBUTION_SQL,
            Metric::ConfidenceByType => CONFIDENCE_BY_TYPE_SQL,
            Metric::ProcessingTimeTrend => PROCESSING_TIME_TREND_SQL,
            Metric::ProcessingTimeByTypeAndPages => PROCESSING_TIME_BY_TYPE_AND_PAGES_SQL,
        }
    }
}

const TOTAL_DOCUMENTS_SQL: &str = r#"
WITH current_month AS (
  SELECT COUNT(DISTINCT filename) as count
  FROM pages
  WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE)
),
previous_month AS (
  SELECT COUNT(DISTINCT filename) as count
  FROM pages
  WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE - INTERVAL '1 month')
    AND created_at < DATE_TRUNC('month', CURRENT_DATE)
),
total AS (
  SELECT COUNT(DISTINCT filename) as count
  FROM pages
)
SELECT
  t.count as total,
  c.count as current_month,
  p.count as previous_month,
  CASE
    WHEN p.count = 0 THEN 100
    ELSE ROUND(((c.count::numeric - p.count::numeric) / p.count::numeric) * 100, 1)
  END as percentage_change
FROM total t, current_month c, previous_month p
"#;

const AVG_CONFIDENCE_SQL: &str = r#"
WITH current_month AS (
  SELECT AVG(page_confidence) as avg_confidence
  FROM pages
  WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE)
),
previous_month AS (
  SELECT AVG(page_confidence) as avg_confidence
  FROM pages
  WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE - INTERVAL '1 month')
    AND created_at < DATE_TRUNC('month', CURRENT_DATE)
),
total AS (
  SELECT AVG(page_confidence) as avg_confidence
  FROM pages
)
SELECT
  ROUND(t.avg_confidence::numeric * 100, 1) as total,
  ROUND(c.avg_confidence::numeric * 100, 1) as current_month,
  ROUND(p.avg_confidence::numeric * 100, 1) as previous_month,
  CASE
    WHEN p.avg_confidence = 0 THEN 0
    ELSE ROUND(((c.avg_confidence::numeric - p.avg_confidence::numeric) / p.avg_confidence::numeric) * 100, 1)
  END as percentage_change
FROM total t, current_month c, previous_month p
"#;

const AVG_PROCESSING_TIME_SQL: &str = r#"
WITH current_month AS (
  SELECT AVG(processing_time) as avg_time
  FROM pages
  WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE)
),
previous_month AS (
  SELECT AVG(processing_time) as avg_time
  FROM pages
  WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE - INTERVAL '1 month')
    AND created_at < DATE_TRUNC('month', CURRENT_DATE)
),
total AS (
  SELECT AVG(processing_time) as avg_time
  FROM pages
)
SELECT
  ROUND(t.avg_time::numeric, 1) as total,
  ROUND(c.avg_time::numeric, 1) as current_month,
  ROUND(p.avg_time::numeric, 1) as previous_month,
  ROUND((c.avg_time::numeric - p.avg_time::numeric), 1) as time_change
FROM total t, current_month c, previous_month p
"#;

const CONFIDENCE_BY_TYPE_OVER_TIME_SQL: &str = r#"
SELECT
  TO_CHAR(DATE_TRUNC('month', created_at), 'Mon') as month,
  page_label,
  ROUND(AVG(page_confidence::numeric) * 100, 1) as confidence
FROM pages
WHERE created_at >= CURRENT_DATE - INTERVAL '6 months'
GROUP BY DATE_TRUNC('month', created_at), page_label
ORDER BY DATE_TRUNC('month', created_at), page_label
"#;

const VOLUME_OVER_TIME_SQL: &str = r#"
SELECT
  TO_CHAR(DATE_TRUNC('month', created_at), 'Mon') as month,
  COUNT(DISTINCT filename) as count
FROM pages
WHERE created_at >= CURRENT_DATE - INTERVAL '6 months'
GROUP BY DATE_TRUNC('month', created_at)
ORDER BY DATE_TRUNC('month', created_at)
"#;

const FIELD_EXTRACTION_SUCCESS_SQL: &str = r#"
WITH extraction_attempts AS (
  SELECT
    key,
    COUNT(*) as total_attempts,
    COUNT(CASE WHEN value IS NOT NULL AND value != '' THEN 1 END) as successful_extractions
  FROM extracted2
  GROUP BY key
  ORDER BY total_attempts DESC
  LIMIT 6
)
SELECT
  key as name,
  ROUND((successful_extractions::numeric / total_attempts) * 100, 1) as success,
  ROUND(((total_attempts::numeric - successful_extractions::numeric) / total_attempts) * 100, 1) as failure
FROM extraction_attempts
"#;

const DOCUMENT_TYPE_DISTRIBUTION_SQL: &str = r#"
SELECT
  page_label as name,
  COUNT(*) as value
FROM pages
GROUP BY page_label
ORDER BY value DESC
"#;

const CONFIDENCE_BY_TYPE_SQL: &str = r#"
SELECT
  page_label as type,
  ROUND(AVG(page_confidence::numeric) * 100, 1) as confidence
FROM pages
GROUP BY page_label
ORDER BY confidence DESC
"#;

const PROCESSING_TIME_TREND_SQL: &str = r#"
SELECT
  TO_CHAR(created_at, 'YYYY-MM-DD') as date,
  ROUND(AVG(processing_time::numeric), 1) as time
FROM pages
WHERE created_at >= CURRENT_DATE - INTERVAL '14 days'
GROUP BY TO_CHAR(created_at, 'YYYY-MM-DD')
ORDER BY date
"#;

const PROCESSING_TIME_BY_TYPE_AND_PAGES_SQL: &str = r#"
SELECT
  page_label as type,
  ROUND(AVG(CASE WHEN page_number = 1 THEN processing_time::numeric END), 1) as pages1,
  ROUND(AVG(CASE WHEN page_number = 2 THEN processing_time::numeric END), 1) as pages2,
  ROUND(AVG(CASE WHEN page_number >= 3 THEN processing_time::numeric END), 1) as pages3Plus
FROM pages
GROUP BY page_label
"#;
