//! Request parameter encoding
//!
//! Operation inputs are serialized to a JSON object, the nested `extra` bag is
//! flattened into the top level, and the result is encoded into the key/value
//! pairs a web form would submit.

use crate::error::ProvisionError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key of the caller-supplied bag merged into the top level.
pub const EXTRA_KEY: &str = "extra";

/// Serialize an operation input into a parameter map.
pub fn to_param_map<T: Serialize>(params: &T) -> Result<Map<String, Value>, ProvisionError> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ProvisionError::provision_function(format!(
            "Request parameters must serialize to an object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(ProvisionError::provision_function(format!(
            "Unable to encode request parameters: {e}"
        ))),
    }
}

/// Pull `extra` out of `params` and merge its entries into the top level.
///
/// Keys from `extra` win over same-named top-level keys. A non-object `extra`
/// is dropped.
pub fn merge_extra(mut params: Map<String, Value>) -> Map<String, Value> {
    match params.remove(EXTRA_KEY) {
        Some(Value::Object(extra)) => {
            for (key, value) in extra {
                params.insert(key, value);
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            tracing::warn!(
                target: "provision_licenses::http",
                kind = json_type(&other),
                "Ignoring non-object extra parameters"
            );
        }
    }
    params
}

/// Encode a parameter map into form pairs.
///
/// `true`/`false` become `1`/`0`, nulls are omitted and nested values use
/// bracket notation (`key[0]`, `key[name]`).
pub fn encode_params(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        encode_value(key, value, &mut pairs);
    }
    pairs
}

fn encode_value(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((key.to_string(), if *flag { "1" } else { "0" }.into())),
        Value::Number(number) => pairs.push((key.to_string(), number.to_string())),
        Value::String(text) => pairs.push((key.to_string(), text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                encode_value(&format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                encode_value(&format!("{key}[{name}]"), item, pairs);
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
