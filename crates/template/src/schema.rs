//! Template config types
//!
//! A `TemplateConfig` is an ordered list of typed blocks plus a style
//! sheet. Blocks carry either literal content or a bind path pointing
//! into the user's form data; the renderer walks them in order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Embedded JSON Schema for template config validation
/// This schema can be used by IDEs and validators for template authoring
pub const TEMPLATE_SCHEMA: &str = include_str!("../data/template-schema.json");

/// A CSS property value (string or number)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Text(s) => f.write_str(s),
            StyleValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Inline CSS declarations for one element or style key
pub type CssStyle = BTreeMap<String, StyleValue>;

/// Accepted style-key aliases, mapped to their canonical names.
const STYLE_ALIASES: &[(&str, &str)] = &[
    ("page", "document"),
    ("h1", "heading1"),
    ("h2", "heading2"),
    ("h3", "heading3"),
    ("h4", "heading4"),
    ("h5", "heading5"),
    ("h6", "heading6"),
    ("p", "paragraph"),
];

/// Canonicalize a style-sheet key through the alias table
pub fn canonical_style_key(key: &str) -> &str {
    STYLE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key)
}

/// Root template config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Document title
    #[serde(default)]
    pub title: Option<String>,

    /// Style sheet, keyed by style key or alias
    #[serde(default)]
    pub styles: BTreeMap<String, CssStyle>,

    /// Content blocks, in render order
    #[serde(default)]
    pub blocks: Vec<TemplateBlock>,
}

/// A bind reference into the data object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindRef {
    /// Dot-separated path into the data object
    #[serde(alias = "bind")]
    pub path: String,
}

/// One renderable part of a line or static list: literal text or a bind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Literal(String),
    Bound(BindRef),
}

/// Content block (tagged union)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TemplateBlock {
    /// Section heading
    Heading(HeadingBlock),

    /// Paragraph of text
    Paragraph(ParagraphBlock),

    /// Single line assembled from several parts
    Line(LineBlock),

    /// Bullet or numbered list
    List(ListBlock),

    /// Data table with declared columns
    Table(TableBlock),

    /// Label/value rows as a two-column table
    KeyValueTable(KeyValueBlock),

    /// Label/value rows as a grid of divs
    KeyValueList(KeyValueBlock),

    /// Horizontal rule
    Divider,

    /// Fixed-height vertical gap
    Spacer(SpacerBlock),

    /// Signature area
    Signature(SignatureBlock),

    /// Catch-all for foreign block types; rendered as nothing, with a warning
    #[serde(other)]
    Unknown,
}

impl TemplateBlock {
    /// Name of the block variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            TemplateBlock::Heading(_) => "heading",
            TemplateBlock::Paragraph(_) => "paragraph",
            TemplateBlock::Line(_) => "line",
            TemplateBlock::List(_) => "list",
            TemplateBlock::Table(_) => "table",
            TemplateBlock::KeyValueTable(_) => "keyValueTable",
            TemplateBlock::KeyValueList(_) => "keyValueList",
            TemplateBlock::Divider => "divider",
            TemplateBlock::Spacer(_) => "spacer",
            TemplateBlock::Signature(_) => "signature",
            TemplateBlock::Unknown => "unknown",
        }
    }
}

fn default_heading_level() -> u8 {
    1
}

/// Heading block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingBlock {
    /// Static text; placeholders of the form `{{path}}` are substituted
    #[serde(default)]
    pub text: Option<String>,

    /// Bind path (used when no static text is given)
    #[serde(default, alias = "bind")]
    pub path: Option<String>,

    /// Heading level (1-6)
    #[serde(default = "default_heading_level")]
    pub level: u8,

    /// Block-level style override
    #[serde(default)]
    pub style: Option<CssStyle>,
}

/// Paragraph block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    /// Static text; placeholders of the form `{{path}}` are substituted
    #[serde(default)]
    pub text: Option<String>,

    /// Bind path (used when no static text is given)
    #[serde(default, alias = "bind")]
    pub path: Option<String>,

    /// Block-level style override
    #[serde(default)]
    pub style: Option<CssStyle>,
}

/// Line block: parts joined with single spaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineBlock {
    #[serde(default)]
    pub parts: Vec<Segment>,
}

/// List block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    /// Bind path to an array; one item is rendered per element
    #[serde(default, alias = "dataPath", alias = "sourcePath")]
    pub path: Option<String>,

    /// Numbered instead of bulleted
    #[serde(default)]
    pub ordered: bool,

    /// Static items, used when no bind path is given
    #[serde(default)]
    pub items: Vec<Segment>,
}

/// Table block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Bind path to an array of row objects.
    /// When absent, the whole data object is the single row.
    #[serde(default, alias = "dataPath", alias = "sourcePath")]
    pub path: Option<String>,

    /// Column definitions
    pub columns: Vec<TableColumn>,
}

/// Table column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column header text
    pub header: String,

    /// Bind path resolved against each row
    pub path: String,
}

/// Label/value block payload, shared by `keyValueTable` and `keyValueList`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValueBlock {
    pub rows: Vec<KeyValueRow>,
}

/// One label/value row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueRow {
    /// Row label
    pub label: String,

    /// Bind path for the value
    pub path: String,
}

fn default_spacer_height() -> f64 {
    16.0
}

/// Spacer block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacerBlock {
    /// Gap height in points
    #[serde(default = "default_spacer_height")]
    pub height: f64,
}

impl Default for SpacerBlock {
    fn default() -> Self {
        Self {
            height: default_spacer_height(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Signature block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    /// Static signer name
    #[serde(default)]
    pub name: Option<String>,

    /// Bind path for the signer name
    #[serde(default)]
    pub name_path: Option<String>,

    /// Static signer title
    #[serde(default)]
    pub title: Option<String>,

    /// Bind path for the signer title
    #[serde(default)]
    pub title_path: Option<String>,

    /// Prefix with a "Regards," line
    #[serde(default = "default_true")]
    pub regards: bool,
}

impl Default for SignatureBlock {
    fn default() -> Self {
        Self {
            name: None,
            name_path: None,
            title: None,
            title_path: None,
            regards: true,
        }
    }
}
