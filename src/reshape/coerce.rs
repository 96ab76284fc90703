//! Scalar coercion
//!
//! Source dumps carry numbers as quoted strings, integers as floats and
//! booleans as `"on"`. These helpers turn a raw JSON value into the scalar
//! the target column expects, or `None` when nothing sensible can be
//! recovered. None of them fail.

use serde_json::Value;

/// Coerce a value to an integer.
///
/// Accepts native integers, floats (truncated) and numeric strings, with
/// surrounding whitespace and quote characters stripped (`"\"42\""` -> 42).
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().and_then(float_to_int)),
        Value::String(s) => {
            let text = unquote(s);
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(float_to_int)
            })
        }
        _ => None,
    }
}

/// Coerce a value to a float. Non-finite results are dropped.
pub fn coerce_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => unquote(s).parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Coerce a value to a boolean.
///
/// `true`, `"on"`, `"true"` and `1` are true; anything else is false.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "on" | "true"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Coerce a scalar to a string. Numbers keep their JSON spelling.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce an array of scalars to a list of strings.
///
/// Elements that are not scalars are dropped; a non-array yields `None`.
pub fn coerce_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(coerce_string).collect()),
        _ => None,
    }
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"').trim()
}

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}
