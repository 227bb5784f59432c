// src/normalize/entities.rs
//! Scalar conversions shared by the record normalizers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Decodes HTML entities (`&amp;`, `&#8211;`, `&hellip;`, ...).
///
/// Applied exactly once, at normalization. Decoding again would turn a
/// literal `&amp;` the author wrote into `&`.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Resolves a CMS timestamp, preferring the GMT field.
///
/// The CMS writes `2024-05-01T10:00:00` without an offset; the GMT field
/// is UTC by definition and the local field is read as UTC when it is the
/// only one present. Missing or unparseable values become the Unix epoch.
pub fn resolve_timestamp(gmt: Option<&str>, local: Option<&str>) -> DateTime<Utc> {
    gmt.and_then(parse_timestamp)
        .or_else(|| local.and_then(parse_timestamp))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// A string or number as text; anything else is absent.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// A number or numeric string as `f64`.
pub fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Loosely truthy meta flags: `true`, non-zero numbers, and the strings
/// `"1"`, `"true"`, `"yes"` or `"builder"`.
pub fn meta_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "builder"
        ),
        _ => false,
    }
}
