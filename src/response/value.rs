//! Loose value semantics used when reading service responses.
//!
//! Services return license keys and counters as strings, numbers or booleans
//! more or less at random, so extraction works on "emptiness" and
//! "numeric-ness" rather than on exact JSON types.

use serde_json::Value;

/// Whether `value` counts as empty: null, `false`, zero, `""`, `"0"` or an
/// empty array/object.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// String form of a scalar: strings as-is, numbers in decimal, `true` as
/// `"1"` and `false` as `""`. Arrays, objects and null have none.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer value of a number or numeric string, truncated toward zero.
///
/// Booleans, non-numeric strings and containers yield `None`.
pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().map(truncate)),
        Value::String(text) => {
            let text = text.trim();
            if !is_numeric_str(text) {
                return None;
            }
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(truncate))
        }
        _ => None,
    }
}

fn truncate(n: f64) -> i64 {
    // `as` saturates on overflow
    n.trunc() as i64
}

/// Decimal number with optional sign, fraction and exponent (`-1.5e3`, `.5`).
fn is_numeric_str(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
