//! Config parsing and data binding

use crate::{Result, TemplateConfig, TemplateError};
use serde_json::Value;

/// Parse a template config from a JSON string
pub fn parse_config(json: &str) -> Result<TemplateConfig> {
    serde_json::from_str(json).map_err(|e| TemplateError::ParseError(e.to_string()))
}

/// Resolve a dot-separated bind path against data
///
/// Objects are traversed by key, arrays by numeric segment:
/// - `customer.name` - nested field
/// - `items.0.sku` - array element field
///
/// Any missing segment yields `None`; resolution never fails.
pub fn resolve_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = data;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Format a resolved value for text output
///
/// Arrays of primitives join with `", "`; arrays containing objects and
/// plain objects fall back to compact JSON. Null becomes the empty string.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            let all_primitive = items
                .iter()
                .all(|v| !matches!(v, Value::Array(_) | Value::Object(_)));
            if all_primitive {
                items
                    .iter()
                    .map(display_value)
                    .collect::<Vec<_>>()
                    .join(", ")
            } else {
                value.to_string()
            }
        }
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_simple_field() {
        let data = json!({ "name": "John" });
        assert_eq!(resolve_path(&data, "name"), Some(&json!("John")));
    }

    #[test]
    fn test_resolve_nested_field() {
        let data = json!({
            "customer": {
                "address": { "city": "Springfield" }
            }
        });
        assert_eq!(
            resolve_path(&data, "customer.address.city"),
            Some(&json!("Springfield"))
        );
    }

    #[test]
    fn test_resolve_array_index() {
        let data = json!({
            "items": [
                { "name": "Item 1" },
                { "name": "Item 2" }
            ]
        });
        assert_eq!(resolve_path(&data, "items.1.name"), Some(&json!("Item 2")));
    }

    #[test]
    fn test_resolve_missing_field() {
        let data = json!({ "name": "John" });
        assert_eq!(resolve_path(&data, "missing"), None);
        assert_eq!(resolve_path(&data, "name.deeper"), None);
        assert_eq!(resolve_path(&data, ""), None);
    }

    #[test]
    fn test_display_primitives() {
        assert_eq!(display_value(&json!("hello")), "hello");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(null)), "");
    }

    #[test]
    fn test_display_primitive_array_joins() {
        assert_eq!(display_value(&json!(["a", "b", 3])), "a, b, 3");
    }

    #[test]
    fn test_display_object_array_is_compact_json() {
        assert_eq!(display_value(&json!([{"a": 1}])), r#"[{"a":1}]"#);
        assert_eq!(display_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "title": "Invoice",
            "blocks": [
                { "type": "heading", "text": "Invoice", "level": 1 },
                { "type": "divider" }
            ]
        }"#;

        let config = parse_config(json).unwrap();
        assert_eq!(config.title.as_deref(), Some("Invoice"));
        assert_eq!(config.blocks.len(), 2);
    }

    #[test]
    fn test_parse_config_invalid_json() {
        assert!(parse_config("{ nope").is_err());
    }
}
