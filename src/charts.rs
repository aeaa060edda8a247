//! Chart dataset extraction.
//!
//! Normalized tables are stringly-typed: cell values arrive as JSON numbers
//! when the backend returned rows and as strings when it returned a text
//! dump. The extractors here turn a [`NormalizedTable`] into the typed row
//! shapes the dashboard's charts consume, tolerating both encodings.
//!
//! Every extractor returns `Option`: `None` means "this table cannot back
//! the chart" (empty result, missing column, or an unparseable required
//! cell) and the caller substitutes the fallback dataset. Extractors never
//! panic and never partially succeed on a required field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{NormalizedRecord, NormalizedTable};

/// A count statistic with month-over-month percentage change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountStat {
    pub total: u64,
    pub percentage_change: f64,
}

/// A score statistic (percentage) with month-over-month percentage change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStat {
    pub total: f64,
    pub percentage_change: f64,
}

/// A duration statistic (seconds) with absolute month-over-month change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStat {
    pub total: f64,
    pub time_change: f64,
}

/// Monthly document volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub month: String,
    pub count: u64,
}

/// Per-field extraction success/failure rate, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRate {
    pub name: String,
    pub success: f64,
    pub failure: f64,
}

/// One slice of the document-type distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSlice {
    pub name: String,
    pub value: u64,
}

/// Mean confidence for one document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeConfidence {
    #[serde(rename = "type")]
    pub label: String,
    pub confidence: f64,
}

/// Daily mean processing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub time: f64,
}

/// Mean processing time for one document type, bucketed by page count.
///
/// Buckets are optional: `AVG` over an empty bucket is SQL NULL, which the
/// text dump renders as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTimings {
    #[serde(rename = "type")]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages2: Option<f64>,
    #[serde(rename = "pages3Plus", skip_serializing_if = "Option::is_none")]
    pub pages3_plus: Option<f64>,
}

/// One wide chart row with a dynamic column set, e.g.
/// `{"month": "Jan", "invoice": 92.0, "receipt": 88.0}`.
pub type WideRow = IndexMap<String, Value>;

/// First row of a summary table as a [`CountStat`].
pub fn count_stat(table: &NormalizedTable) -> Option<CountStat> {
    let row = table.first()?;
    Some(CountStat {
        total: cell_u64(row, "total")?,
        percentage_change: cell_f64(row, "percentage_change")?,
    })
}

/// First row of a summary table as a [`ScoreStat`].
pub fn score_stat(table: &NormalizedTable) -> Option<ScoreStat> {
    let row = table.first()?;
    Some(ScoreStat {
        total: cell_f64(row, "total")?,
        percentage_change: cell_f64(row, "percentage_change")?,
    })
}

/// First row of a summary table as a [`DurationStat`].
pub fn duration_stat(table: &NormalizedTable) -> Option<DurationStat> {
    let row = table.first()?;
    Some(DurationStat {
        total: cell_f64(row, "total")?,
        time_change: cell_f64(row, "time_change")?,
    })
}

/// Pivot (month, page_label, confidence) long-form rows into wide chart
/// rows, one per month with a column per label. Month order and label order
/// follow first appearance in the table, which the SQL already sorts
/// chronologically.
pub fn confidence_over_time(table: &NormalizedTable) -> Option<Vec<WideRow>> {
    if table.is_empty() {
        return None;
    }
    let mut months: IndexMap<String, WideRow> = IndexMap::new();
    for row in table {
        let month = cell_string(row, "month")?;
        let label = cell_string(row, "page_label")?;
        let confidence = cell_f64(row, "confidence")?;
        let wide = months.entry(month.clone()).or_insert_with(|| {
            let mut wide = WideRow::new();
            wide.insert("month".to_string(), Value::String(month));
            wide
        });
        wide.insert(label, number(confidence)?);
    }
    Some(months.into_values().collect())
}

/// (month, count) rows for the volume chart.
pub fn volume_over_time(table: &NormalizedTable) -> Option<Vec<VolumePoint>> {
    non_empty(table)?
        .iter()
        .map(|row| {
            Some(VolumePoint {
                month: cell_string(row, "month")?,
                count: cell_u64(row, "count")?,
            })
        })
        .collect()
}

/// (name, success, failure) rows for the field-extraction chart.
pub fn field_extraction(table: &NormalizedTable) -> Option<Vec<FieldRate>> {
    non_empty(table)?
        .iter()
        .map(|row| {
            Some(FieldRate {
                name: cell_string(row, "name")?,
                success: cell_f64(row, "success")?,
                failure: cell_f64(row, "failure")?,
            })
        })
        .collect()
}

/// (name, value) rows for the document-type distribution chart.
pub fn type_distribution(table: &NormalizedTable) -> Option<Vec<TypeSlice>> {
    non_empty(table)?
        .iter()
        .map(|row| {
            Some(TypeSlice {
                name: cell_string(row, "name")?,
                value: cell_u64(row, "value")?,
            })
        })
        .collect()
}

/// (type, confidence) rows for the per-type confidence chart.
pub fn confidence_by_type(table: &NormalizedTable) -> Option<Vec<TypeConfidence>> {
    non_empty(table)?
        .iter()
        .map(|row| {
            Some(TypeConfidence {
                label: cell_string(row, "type")?,
                confidence: cell_f64(row, "confidence")?,
            })
        })
        .collect()
}

/// (date, time) rows for the processing-time trend chart.
pub fn processing_trend(table: &NormalizedTable) -> Option<Vec<TrendPoint>> {
    non_empty(table)?
        .iter()
        .map(|row| {
            Some(TrendPoint {
                date: cell_string(row, "date")?,
                time: cell_f64(row, "time")?,
            })
        })
        .collect()
}

/// Per-type page-count timing rows.
pub fn page_timings(table: &NormalizedTable) -> Option<Vec<PageTimings>> {
    non_empty(table)?
        .iter()
        .map(|row| {
            Some(PageTimings {
                label: cell_string(row, "type")?,
                pages1: cell_f64(row, "pages1"),
                pages2: cell_f64(row, "pages2"),
                // Postgres folds the unquoted SQL alias to lowercase; the
                // rows variant may carry either spelling.
                pages3_plus: cell_f64(row, "pages3Plus").or_else(|| cell_f64(row, "pages3plus")),
            })
        })
        .collect()
}

fn non_empty(table: &NormalizedTable) -> Option<&NormalizedTable> {
    if table.is_empty() {
        None
    } else {
        Some(table)
    }
}

/// Read a cell as a finite float. Accepts JSON numbers and numeric strings;
/// NULL, `NaN`, and anything unparseable count as missing.
fn cell_f64(row: &NormalizedRecord, key: &str) -> Option<f64> {
    let value = match row.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Read a cell as an unsigned count.
fn cell_u64(row: &NormalizedRecord, key: &str) -> Option<u64> {
    match row.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Read a cell as text. Numbers are rendered; null counts as missing.
fn cell_string(row: &NormalizedRecord, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(value: f64) -> Option<Value> {
    serde_json::Number::from_f64(value).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawResponse};
    use serde_json::json;

    fn table_from(body: &str) -> NormalizedTable {
        normalize(serde_json::from_str::<RawResponse>(body).unwrap())
    }

    #[test]
    fn count_stat_reads_rows_variant() {
        let table = table_from(r#"[{"total": 1391, "percentage_change": 12.5}]"#);
        assert_eq!(
            count_stat(&table),
            Some(CountStat {
                total: 1391,
                percentage_change: 12.5
            })
        );
    }

    #[test]
    fn count_stat_reads_text_variant() {
        let table = table_from(r#""total current_month previous_month percentage_change\n1391 102 82 24.4""#);
        let stat = count_stat(&table).unwrap();
        assert_eq!(stat.total, 1391);
        assert_eq!(stat.percentage_change, 24.4);
    }

    #[test]
    fn empty_table_extracts_nothing() {
        assert_eq!(count_stat(&Vec::new()), None);
        assert_eq!(volume_over_time(&Vec::new()), None);
        assert_eq!(confidence_over_time(&Vec::new()), None);
    }

    #[test]
    fn unparseable_required_cell_fails_the_dataset() {
        let table = table_from(r#"[{"total": "lots", "percentage_change": 1.0}]"#);
        assert_eq!(count_stat(&table), None);

        let table = table_from(r#"[{"month": "Jan", "count": 3}, {"month": "Feb", "count": "n/a"}]"#);
        assert_eq!(volume_over_time(&table), None);
    }

    #[test]
    fn nan_summary_cell_counts_as_missing() {
        // An empty pages table makes the change expression NULL; pandas
        // prints it as NaN.
        let table = table_from(r#""total time_change\n1.8 NaN""#);
        assert_eq!(duration_stat(&table), None);
    }

    #[test]
    fn pivot_produces_one_row_per_month() {
        let table = table_from(
            r#"[
                {"month": "Jan", "page_label": "invoice", "confidence": 92.0},
                {"month": "Jan", "page_label": "receipt", "confidence": 88.0},
                {"month": "Feb", "page_label": "invoice", "confidence": 93.0}
            ]"#,
        );
        let rows = confidence_over_time(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("month"), Some(&json!("Jan")));
        assert_eq!(rows[0].get("invoice"), Some(&json!(92.0)));
        assert_eq!(rows[0].get("receipt"), Some(&json!(88.0)));
        assert_eq!(rows[1].get("month"), Some(&json!("Feb")));
        assert!(!rows[1].contains_key("receipt"));
    }

    #[test]
    fn pivot_keeps_first_seen_month_order() {
        let table = table_from(
            r#""month page_label confidence\nMar invoice 91.0\nApr invoice 94.0\nMar receipt 89.0""#,
        );
        let rows = confidence_over_time(&table).unwrap();
        let months: Vec<&Value> = rows.iter().map(|r| r.get("month").unwrap()).collect();
        assert_eq!(months, [&json!("Mar"), &json!("Apr")]);
        // Late-arriving label still lands on the right month.
        assert_eq!(rows[0].get("receipt"), Some(&json!(89.0)));
    }

    #[test]
    fn page_timings_tolerate_nan_buckets_and_folded_casing() {
        let table = table_from(r#""type pages1 pages2 pages3plus\ninvoice 1.2 NaN 2.5""#);
        let rows = page_timings(&table).unwrap();
        assert_eq!(rows[0].label, "invoice");
        assert_eq!(rows[0].pages1, Some(1.2));
        assert_eq!(rows[0].pages2, None);
        assert_eq!(rows[0].pages3_plus, Some(2.5));
    }

    #[test]
    fn page_timings_serialize_chart_keys() {
        let rows = vec![PageTimings {
            label: "invoice".into(),
            pages1: Some(1.2),
            pages2: None,
            pages3_plus: Some(2.5),
        }];
        let value = serde_json::to_value(&rows).unwrap();
        assert_eq!(value, json!([{"type": "invoice", "pages1": 1.2, "pages3Plus": 2.5}]));
    }

    #[test]
    fn distribution_and_confidence_extract() {
        let table = table_from(r#""name value\ninvoice 45\nreceipt 30""#);
        let slices = type_distribution(&table).unwrap();
        assert_eq!(slices[1], TypeSlice { name: "receipt".into(), value: 30 });

        let table = table_from(r#"[{"type": "invoice", "confidence": 94.2}]"#);
        let rows = confidence_by_type(&table).unwrap();
        assert_eq!(rows[0].label, "invoice");
        assert_eq!(rows[0].confidence, 94.2);
    }

    #[test]
    fn trend_reads_both_variants() {
        let from_text = processing_trend(&table_from(r#""date time\n2024-06-01 2.1""#)).unwrap();
        let from_rows =
            processing_trend(&table_from(r#"[{"date": "2024-06-01", "time": 2.1}]"#)).unwrap();
        assert_eq!(from_text, from_rows);
    }
}
