//! Schema-driven template derivation
//!
//! When no template has been authored for a form, a renderable
//! `TemplateConfig` is derived directly from the form's JSON-Schema-like
//! field description: primitive fields collapse into label/value rows,
//! arrays become lists or tables, and nested objects become titled
//! sections.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::schema::{
    HeadingBlock, KeyValueBlock, KeyValueRow, ListBlock, TableBlock, TableColumn, TemplateBlock,
    TemplateConfig,
};

/// JSON-Schema-like field description (compiler input, never mutated)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    /// Field type
    #[serde(rename = "type", default)]
    pub kind: Option<SchemaType>,

    /// Human-readable field label
    #[serde(default)]
    pub title: Option<String>,

    /// Format hint (e.g. `date`, `email`); carried through, not interpreted
    #[serde(default)]
    pub format: Option<String>,

    /// Enumerated values for choice fields
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<Value>>,

    /// Item schema for `array` fields
    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,

    /// Child fields for `object` fields, in declaration order
    #[serde(default, deserialize_with = "ordered_properties")]
    pub properties: Vec<(String, SchemaNode)>,

    /// Names of required child fields
    #[serde(default)]
    pub required: Vec<String>,
}

/// Schema field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Deserialize a JSON-Schema `properties` map preserving declaration order
fn ordered_properties<'de, D>(deserializer: D) -> Result<Vec<(String, SchemaNode)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PropertiesVisitor;

    impl<'de> serde::de::Visitor<'de> for PropertiesVisitor {
        type Value = Vec<(String, SchemaNode)>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a map of property names to schema nodes")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut entries = Vec::new();
            while let Some((key, node)) = access.next_entry::<String, SchemaNode>()? {
                entries.push((key, node));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_any(PropertiesVisitor)
}

/// Derive a `TemplateConfig` from a schema
///
/// Walks `properties` in declaration order, so compiling the same schema
/// twice yields identical block order and bindings. A schema without
/// properties compiles to an empty block list.
pub fn compile_schema(schema: &SchemaNode) -> TemplateConfig {
    let mut blocks = Vec::new();
    compile_properties(schema, "", &mut blocks);

    TemplateConfig {
        title: schema.title.clone(),
        styles: Default::default(),
        blocks,
    }
}

fn compile_properties(schema: &SchemaNode, prefix: &str, blocks: &mut Vec<TemplateBlock>) {
    // Consecutive primitive fields accumulate into one keyValueList block
    let mut pending: Vec<KeyValueRow> = Vec::new();

    for (key, node) in &schema.properties {
        let path = join_path(prefix, key);
        let label = node.title.clone().unwrap_or_else(|| title_case(key));

        match node.kind {
            Some(SchemaType::Array) => {
                flush_rows(&mut pending, blocks);

                let object_items = node
                    .items
                    .as_deref()
                    .filter(|item| item.kind == Some(SchemaType::Object));
                if let Some(item) = object_items {
                    let columns = item
                        .properties
                        .iter()
                        .map(|(col_key, col_node)| TableColumn {
                            header: col_node
                                .title
                                .clone()
                                .unwrap_or_else(|| title_case(col_key)),
                            path: col_key.clone(),
                        })
                        .collect();
                    blocks.push(TemplateBlock::Table(TableBlock {
                        path: Some(path),
                        columns,
                    }));
                } else {
                    blocks.push(TemplateBlock::List(ListBlock {
                        path: Some(path),
                        ordered: false,
                        items: Vec::new(),
                    }));
                }
            }
            Some(SchemaType::Object) => {
                flush_rows(&mut pending, blocks);
                blocks.push(TemplateBlock::Heading(HeadingBlock {
                    text: Some(label),
                    path: None,
                    level: 2,
                    style: None,
                }));
                compile_properties(node, &path, blocks);
            }
            // string/number/integer/boolean; untyped fields are treated as text
            _ => pending.push(KeyValueRow { label, path }),
        }
    }

    flush_rows(&mut pending, blocks);
}

fn flush_rows(pending: &mut Vec<KeyValueRow>, blocks: &mut Vec<TemplateBlock>) {
    if !pending.is_empty() {
        blocks.push(TemplateBlock::KeyValueList(KeyValueBlock {
            rows: std::mem::take(pending),
        }));
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Title-case a field key: `_`/`-` become spaces, each word is capitalized
fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> SchemaNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("sku"), "Sku");
        assert_eq!(title_case("unit_price"), "Unit Price");
        assert_eq!(title_case("due-date"), "Due Date");
    }

    #[test]
    fn test_primitive_fields_accumulate_into_key_value_list() {
        let schema = parse(
            r#"{
                "type": "object",
                "properties": {
                    "name": { "type": "string", "title": "Name" },
                    "age": { "type": "integer" }
                }
            }"#,
        );

        let config = compile_schema(&schema);
        assert_eq!(config.blocks.len(), 1);
        match &config.blocks[0] {
            TemplateBlock::KeyValueList(kv) => {
                assert_eq!(kv.rows.len(), 2);
                assert_eq!(kv.rows[0].label, "Name");
                assert_eq!(kv.rows[0].path, "name");
                assert_eq!(kv.rows[1].label, "Age");
                assert_eq!(kv.rows[1].path, "age");
            }
            other => panic!("Expected keyValueList, got {other:?}"),
        }
    }

    #[test]
    fn test_object_array_becomes_table() {
        let schema = parse(
            r#"{
                "type": "object",
                "properties": {
                    "name": { "type": "string", "title": "Name" },
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "sku": { "type": "string" },
                                "qty": { "type": "number" }
                            }
                        }
                    }
                }
            }"#,
        );

        let config = compile_schema(&schema);
        assert_eq!(config.blocks.len(), 2);

        match &config.blocks[0] {
            TemplateBlock::KeyValueList(kv) => {
                assert_eq!(kv.rows.len(), 1);
                assert_eq!(kv.rows[0].label, "Name");
            }
            other => panic!("Expected keyValueList, got {other:?}"),
        }

        match &config.blocks[1] {
            TemplateBlock::Table(table) => {
                assert_eq!(table.path.as_deref(), Some("items"));
                let headers: Vec<_> = table.columns.iter().map(|c| c.header.as_str()).collect();
                assert_eq!(headers, vec!["Sku", "Qty"]);
                let paths: Vec<_> = table.columns.iter().map(|c| c.path.as_str()).collect();
                assert_eq!(paths, vec!["sku", "qty"]);
            }
            other => panic!("Expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_primitive_array_becomes_list() {
        let schema = parse(
            r#"{
                "type": "object",
                "properties": {
                    "tags": { "type": "array", "items": { "type": "string" } }
                }
            }"#,
        );

        let config = compile_schema(&schema);
        match &config.blocks[0] {
            TemplateBlock::List(list) => {
                assert_eq!(list.path.as_deref(), Some("tags"));
                assert!(!list.ordered);
            }
            other => panic!("Expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_object_becomes_section_with_prefixed_paths() {
        let schema = parse(
            r#"{
                "type": "object",
                "properties": {
                    "customer": {
                        "type": "object",
                        "title": "Customer",
                        "properties": {
                            "name": { "type": "string" },
                            "email": { "type": "string", "format": "email" }
                        }
                    }
                }
            }"#,
        );

        let config = compile_schema(&schema);
        assert_eq!(config.blocks.len(), 2);

        match &config.blocks[0] {
            TemplateBlock::Heading(h) => {
                assert_eq!(h.text.as_deref(), Some("Customer"));
                assert_eq!(h.level, 2);
            }
            other => panic!("Expected heading, got {other:?}"),
        }

        match &config.blocks[1] {
            TemplateBlock::KeyValueList(kv) => {
                assert_eq!(kv.rows[0].path, "customer.name");
                assert_eq!(kv.rows[1].path, "customer.email");
            }
            other => panic!("Expected keyValueList, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_without_properties_compiles_to_empty() {
        let schema = parse(r#"{ "type": "object" }"#);
        assert!(compile_schema(&schema).blocks.is_empty());

        let schema = parse(r#"{ "type": "object", "properties": null }"#);
        assert!(compile_schema(&schema).blocks.is_empty());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let json = r#"{
            "type": "object",
            "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "string" },
                "items": { "type": "array", "items": { "type": "string" } },
                "mid": { "type": "boolean" }
            }
        }"#;

        let first = compile_schema(&parse(json));
        let second = compile_schema(&parse(json));
        assert_eq!(first, second);

        // Declaration order survives: zeta before alpha, list between rows
        match (&first.blocks[0], &first.blocks[1], &first.blocks[2]) {
            (
                TemplateBlock::KeyValueList(kv),
                TemplateBlock::List(_),
                TemplateBlock::KeyValueList(tail),
            ) => {
                assert_eq!(kv.rows[0].path, "zeta");
                assert_eq!(kv.rows[1].path, "alpha");
                assert_eq!(tail.rows[0].path, "mid");
            }
            other => panic!("Unexpected block layout: {other:?}"),
        }
    }
}
