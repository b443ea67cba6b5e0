//! Best-effort typed projections of a raw metadata record.
//!
//! Every getter returns `None` for a missing key or a value it cannot coerce.

use serde_json::Value;

use super::RawMetadata;

/// Float from a JSON number or a numeric-looking string.
pub fn get_f64(meta: &RawMetadata, key: &str) -> Option<f64> {
    match meta.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer from a JSON integer, a JSON float (truncated), or a numeric-looking string.
pub fn get_i64(meta: &RawMetadata, key: &str) -> Option<i64> {
    match meta.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// String from a JSON string, or a JSON number rendered as text (e.g. `ShutterSpeed: 0.004`).
pub fn get_string(meta: &RawMetadata, key: &str) -> Option<String> {
    scalar_to_string(meta.get(key)?)
}

/// String list from a JSON array or a single scalar promoted to a one-element list.
pub fn get_strings(meta: &RawMetadata, key: &str) -> Option<Vec<String>> {
    match meta.get(key)? {
        Value::Array(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
        other => scalar_to_string(other).map(|s| vec![s]),
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
