//! Response normalization for the metrics backend.
//!
//! The external backend does not commit to a single response shape. Depending
//! on the endpoint and on how a query result was serialized, a 2xx body may
//! be a JSON array of row objects, a plain-text table dump (pandas
//! `to_string` style), or a `{ "result": ... }` envelope wrapping either.
//! Every dashboard view needs the same thing regardless: an ordered sequence
//! of flat records it can map into chart rows.
//!
//! [`RawResponse`] is the decode boundary: each known upstream shape is a
//! named variant, and anything else lands in [`RawResponse::Unrecognized`]
//! instead of falling through silently. [`normalize`] collapses any variant
//! into a [`NormalizedTable`].
//!
//! # Error policy
//!
//! `normalize` never fails. Empty input, an unknown shape, or a header-only
//! text table all produce an empty table; callers substitute their fallback
//! dataset when they get one. Callers cannot distinguish an empty result
//! from an unparseable one; both come back as an empty table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flat record: column name to cell value, in column order.
///
/// Key order is meaningful. For the text variant it is the header order; for
/// the rows variant it is the key order of the source object.
pub type NormalizedRecord = IndexMap<String, Value>;

/// An ordered sequence of [`NormalizedRecord`]s, row order as received.
pub type NormalizedTable = Vec<NormalizedRecord>;

/// The as-received payload from the metrics backend.
///
/// Deserialized directly from the wire body, so classification happens in
/// one place. Variants are tried in declaration order; [`Self::Unrecognized`]
/// keeps the original JSON value so proxies can still relay the body
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawResponse {
    /// Already-structured rows. Trusted to be flat; passed through unchanged.
    Rows(Vec<NormalizedRecord>),

    /// Whitespace-delimited tabular text, first line = column headers.
    Text(String),

    /// The backend's `{ "result": ... }` envelope. Recursive: the wrapped
    /// value is classified again.
    Envelope {
        result: Box<RawResponse>,
    },

    /// Any other JSON value, `null` and error bodies included.
    Unrecognized(Value),
}

impl RawResponse {
    /// True when normalizing this value yields no records without looking at
    /// row contents (null, unknown shape).
    pub fn is_opaque(&self) -> bool {
        matches!(self, RawResponse::Unrecognized(_))
    }
}

/// Collapse a [`RawResponse`] into the uniform flat-record shape.
///
/// - `Rows` pass through unchanged, so normalization is idempotent on
///   already-structured input.
/// - `Envelope` recurses into the wrapped value.
/// - `Text` is parsed positionally: the first line's whitespace-split tokens
///   name the columns, and every later non-empty line zips against them.
/// - `Unrecognized` degrades to an empty table.
pub fn normalize(raw: RawResponse) -> NormalizedTable {
    match raw {
        RawResponse::Rows(rows) => rows,
        RawResponse::Envelope { result } => normalize(*result),
        RawResponse::Text(text) => parse_text_table(&text),
        RawResponse::Unrecognized(value) => {
            if !value.is_null() {
                tracing::debug!(shape = %shape_name(&value), "unrecognized response shape, returning empty table");
            }
            Vec::new()
        }
    }
}

/// Parse a whitespace-delimited text table into records.
///
/// The Nth header names the Nth token of every data line. A line with fewer
/// tokens than headers leaves the trailing columns unset for that record;
/// tokens beyond the header count are dropped. Empty lines are skipped.
///
/// Cell values containing whitespace do not survive this format. That is a
/// known limitation of the upstream dump, accepted as-is.
fn parse_text_table(text: &str) -> NormalizedTable {
    let mut lines = text.trim().lines();

    let headers: Vec<&str> = match lines.next() {
        Some(header_line) => header_line.split_whitespace().collect(),
        None => return Vec::new(),
    };
    if headers.is_empty() {
        return Vec::new();
    }

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            headers
                .iter()
                .zip(line.split_whitespace())
                .map(|(header, token)| (header.to_string(), Value::String(token.to_string())))
                .collect()
        })
        .collect()
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
