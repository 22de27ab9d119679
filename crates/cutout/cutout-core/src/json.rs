//! Permissive field readers over `serde_json::Value`.
//!
//! Project documents come from several exporters and are loosely typed:
//! numbers sometimes arrive as strings, single children as bare objects
//! instead of one-element arrays, and optional fields are simply absent.
//! Every reader here returns the caller's default instead of failing.

use serde_json::Value;

/// Read a boolean. Strings coerce (`"true"` only); other types fall back.
pub fn load_bool(json: &Value, key: &str, default: bool) -> bool {
    match json.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => default,
    }
}

/// Read a float. Numeric strings are parsed; unparsable strings and other
/// types fall back.
pub fn load_float(json: &Value, key: &str, default: f64) -> f64 {
    match json.get(key) {
        Some(value) => as_float(value).unwrap_or(default),
        None => default,
    }
}

/// Read an integer, truncating fractional numbers toward zero.
pub fn load_int(json: &Value, key: &str, default: i32) -> i32 {
    match json.get(key) {
        Some(value) => as_float(value).map(|f| f as i32).unwrap_or(default),
        None => default,
    }
}

/// Read a string. Non-string values fall back.
pub fn load_string(json: &Value, key: &str, default: &str) -> String {
    match json.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Coerce a scalar JSON value into a float.
pub fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// View a child field as a list: arrays as-is, a lone value as a single
/// element, a missing or null field as empty.
pub fn make_array<'a>(json: &'a Value, key: &str) -> Vec<&'a Value> {
    match json.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

/// JSON type name for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
