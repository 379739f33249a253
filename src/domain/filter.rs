//! Object filter normalization for migration and backup jobs.
//!
//! The filter arrives as loose strings from the `sourceFilter[...]` fields
//! and leaves as the typed shape the server's object filter accepts. Empty
//! strings mean "no constraint" and are sent as `null`.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Offset appended to every filter timestamp. The console assumes a single
/// deployment timezone instead of reading the local one.
pub const FIXED_UTC_OFFSET: &str = "+09:00";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFilter {
    pub path: Option<String>,
    pub contains: Option<Vec<String>>,
    pub suffixes: Option<String>,
    pub exact: Option<String>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub modified_after: Option<String>,
    pub modified_before: Option<String>,
    pub size_filtering_unit: Option<String>,
    pub regex: Option<String>,
}

impl SourceFilter {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub fn normalize_filter(raw: &Map<String, Value>) -> SourceFilter {
    SourceFilter {
        path: text(raw, "path"),
        contains: text(raw, "contains").map(|value| split_contains(&value)),
        suffixes: text(raw, "suffixes"),
        exact: text(raw, "exact"),
        min_size: text(raw, "minSize").map(|value| parse_size("minSize", &value)),
        max_size: text(raw, "maxSize").map(|value| parse_size("maxSize", &value)),
        modified_after: text(raw, "modifiedAfter").map(|value| with_fixed_offset(&value)),
        modified_before: text(raw, "modifiedBefore").map(|value| with_fixed_offset(&value)),
        size_filtering_unit: text(raw, "sizeFilteringUnit"),
        regex: text(raw, "regex"),
    }
}

/// Non-empty string value of `key`.
fn text(raw: &Map<String, Value>, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(value)) if !value.is_empty() => Some(value.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

/// Bad input becomes NaN rather than an error; NaN is encoded as `null`.
fn parse_size(field: &'static str, value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or_else(|_| {
        warn!(field, value, "size bound is not numeric; sending null");
        f64::NAN
    })
}

/// `2024-03-01 12:30` becomes `2024-03-01T12:30+09:00`.
pub fn with_fixed_offset(value: &str) -> String {
    let mut stamp = value.replacen(' ', "T", 1);
    stamp.push_str(FIXED_UTC_OFFSET);
    stamp
}

fn split_contains(value: &str) -> Vec<String> {
    value
        .replace(' ', "")
        .split(',')
        .map(str::to_string)
        .collect()
}
