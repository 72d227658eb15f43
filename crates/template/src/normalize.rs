//! Recursive rehydration of JSON-encoded strings
//!
//! Form data frequently arrives with nested structures serialized as
//! strings (`"{\"a\":1}"`). `normalize` rehydrates those back into
//! objects and arrays before rendering, so bind paths can reach into
//! them.

use serde_json::Value;

/// Maximum rehydration depth. Descent stops here and the value is kept
/// as-is, bounding recursion on pathological nesting.
const MAX_DEPTH: usize = 64;

/// Rehydrate JSON-encoded strings anywhere inside `value`
///
/// A string is replaced only when it is bracket-delimited (`{...}` or
/// `[...]` after trimming) and parses as a JSON object or array; the
/// parsed result is normalized recursively. Everything else passes
/// through unchanged. Never fails: an unparseable string is kept
/// verbatim.
pub fn normalize(value: &Value) -> Value {
    normalize_at(value, 0)
}

fn normalize_at(value: &Value, depth: usize) -> Value {
    if depth >= MAX_DEPTH {
        return value.clone();
    }

    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'));
            if !delimited {
                return value.clone();
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                    normalize_at(&parsed, depth + 1)
                }
                _ => value.clone(),
            }
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| normalize_at(item, depth + 1))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), normalize_at(item, depth + 1)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
