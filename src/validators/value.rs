//! Helpers for inspecting raw JSON values

use serde_json::{Number, Value};

/// Null stands in for an absent value
pub fn is_absent(value: &Value) -> bool {
    value.is_null()
}

/// Absent, or a string that is empty after trimming
pub fn is_absent_or_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// A key-value structure (not an array)
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

/// Scalar rendered as text; `None` for arrays and objects
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numbers print without a trailing `.0` when whole
pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(float_text).unwrap_or_else(|| n.to_string())
}

/// Exponent form outside `[1e-6, 1e21)`, plain decimals inside; `-0` prints as `0`
fn float_text(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Text used when an entry is quoted in a message
pub fn display_text(value: &Value) -> String {
    scalar_text(value).unwrap_or_else(|| value.to_string())
}

/// Equality where numbers compare by magnitude (`1` equals `1.0`)
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}
