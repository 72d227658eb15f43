//! Template rendering
//!
//! Walks the block list of a `TemplateConfig`, resolves bindings against
//! normalized form data, and emits a complete HTML document with an
//! embedded print stylesheet. Rendering is total: missing paths render
//! empty, unknown block types are logged and skipped.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::normalize::normalize;
use crate::parser::{display_value, resolve_path};
use crate::schema::*;

/// Print-oriented base stylesheet wrapped around every document
const BASE_STYLESHEET: &str = "\
body { font-family: Helvetica, Arial, sans-serif; font-size: 12pt; color: #1a1a1a; margin: 1in; line-height: 1.5; }
h1, h2, h3, h4, h5, h6 { page-break-after: avoid; line-height: 1.25; }
h1 { font-size: 22pt; }
h2 { font-size: 17pt; }
h3 { font-size: 14pt; }
table { width: 100%; border-collapse: collapse; page-break-inside: avoid; margin: 8pt 0; }
th, td { border: 1px solid #999; padding: 4pt 6pt; text-align: left; }
th { background: #f0f0f0; }
hr { border: none; border-top: 1px solid #999; margin: 12pt 0; }
.kv-list { margin: 8pt 0; }
.kv-row { display: flex; padding: 2pt 0; }
.kv-label { font-weight: bold; min-width: 2in; }
.signature { margin-top: 36pt; }
.signature-name { font-weight: bold; margin-bottom: 0; }
.signature-title { color: #555; margin-top: 2pt; }";

/// Escape text for safe HTML emission
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a config against form data, producing an HTML document string
pub fn render(config: &TemplateConfig, data: &Value) -> String {
    HtmlRenderer::new(config).render(data)
}

/// Template renderer
pub struct HtmlRenderer<'a> {
    config: &'a TemplateConfig,
    /// Style sheet with keys canonicalized through the alias table
    styles: BTreeMap<&'a str, &'a CssStyle>,
}

impl<'a> HtmlRenderer<'a> {
    /// Create a renderer for a config
    pub fn new(config: &'a TemplateConfig) -> Self {
        let styles = config
            .styles
            .iter()
            .map(|(key, style)| (canonical_style_key(key), style))
            .collect();
        Self { config, styles }
    }

    /// Render the config with data
    pub fn render(&self, data: &Value) -> String {
        let data = normalize(data);

        let mut body = String::new();
        for block in &self.config.blocks {
            self.render_block(&mut body, block, &data);
        }

        self.wrap_document(&body)
    }

    fn sheet_style(&self, key: &str) -> Option<&CssStyle> {
        self.styles.get(key).copied()
    }

    fn render_block(&self, out: &mut String, block: &TemplateBlock, data: &Value) {
        match block {
            TemplateBlock::Heading(b) => self.render_heading(out, b, data),
            TemplateBlock::Paragraph(b) => self.render_paragraph(out, b, data),
            TemplateBlock::Line(b) => self.render_line(out, b, data),
            TemplateBlock::List(b) => self.render_list(out, b, data),
            TemplateBlock::Table(b) => self.render_table(out, b, data),
            TemplateBlock::KeyValueTable(b) => self.render_kv_table(out, b, data),
            TemplateBlock::KeyValueList(b) => self.render_kv_list(out, b, data),
            TemplateBlock::Divider => out.push_str("<hr>\n"),
            TemplateBlock::Spacer(b) => {
                out.push_str(&format!(
                    "<div style=\"height: {}pt\"></div>\n",
                    b.height
                ));
            }
            TemplateBlock::Signature(b) => self.render_signature(out, b, data),
            TemplateBlock::Unknown => {
                log::warn!("skipping unrecognized template block");
            }
        }
    }

    fn render_heading(&self, out: &mut String, block: &HeadingBlock, data: &Value) {
        let level = block.level.clamp(1, 6);
        let text = resolve_text(block.text.as_deref(), block.path.as_deref(), data);

        let level_key = format!("heading{level}");
        let style = block
            .style
            .as_ref()
            .or_else(|| self.sheet_style(&level_key))
            .or_else(|| self.sheet_style("heading"));

        out.push_str(&format!(
            "<h{level}{}>{text}</h{level}>\n",
            style_attr(style)
        ));
    }

    fn render_paragraph(&self, out: &mut String, block: &ParagraphBlock, data: &Value) {
        let text = resolve_text(block.text.as_deref(), block.path.as_deref(), data);
        let style = block
            .style
            .as_ref()
            .or_else(|| self.sheet_style("paragraph"));

        out.push_str(&format!("<p{}>{text}</p>\n", style_attr(style)));
    }

    fn render_line(&self, out: &mut String, block: &LineBlock, data: &Value) {
        let parts: Vec<String> = block
            .parts
            .iter()
            .map(|part| match part {
                Segment::Literal(text) => substitute(text, data),
                Segment::Bound(bind) => {
                    let value = resolve_path(data, &bind.path)
                        .map(display_value)
                        .unwrap_or_default();
                    escape_html(&value)
                }
            })
            .filter(|part| !part.is_empty())
            .collect();

        out.push_str(&format!("<p class=\"line\">{}</p>\n", parts.join(" ")));
    }

    fn render_list(&self, out: &mut String, block: &ListBlock, data: &Value) {
        let mut items: Vec<String> = Vec::new();

        let bound = block
            .path
            .as_deref()
            .and_then(|path| resolve_path(data, path))
            .and_then(Value::as_array);

        if let Some(elements) = bound {
            for element in elements {
                items.push(escape_html(&display_value(element)));
            }
        } else {
            for item in &block.items {
                match item {
                    Segment::Literal(text) => items.push(substitute(text, data)),
                    Segment::Bound(bind) => match resolve_path(data, &bind.path) {
                        // A bound array flattens into one item per element
                        Some(Value::Array(elements)) => {
                            for element in elements {
                                items.push(escape_html(&display_value(element)));
                            }
                        }
                        Some(value) => items.push(escape_html(&display_value(value))),
                        None => {}
                    },
                }
            }
        }

        let tag = if block.ordered { "ol" } else { "ul" };
        out.push_str(&format!("<{tag}>\n"));
        for item in items {
            out.push_str(&format!("<li>{item}</li>\n"));
        }
        out.push_str(&format!("</{tag}>\n"));
    }

    fn render_table(&self, out: &mut String, block: &TableBlock, data: &Value) {
        // Bound path resolves to the row array; without one the whole
        // data object is the single row.
        let rows: Vec<&Value> = match block.path.as_deref() {
            Some(path) => resolve_path(data, path)
                .and_then(Value::as_array)
                .map(|items| items.iter().collect())
                .unwrap_or_default(),
            None => vec![data],
        };

        out.push_str(&format!("<table{}>\n", style_attr(self.sheet_style("table"))));
        out.push_str("<thead><tr>");
        for column in &block.columns {
            out.push_str(&format!("<th>{}</th>", escape_html(&column.header)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");

        for row in rows {
            out.push_str("<tr>");
            for column in &block.columns {
                let value = resolve_path(row, &column.path)
                    .map(display_value)
                    .unwrap_or_default();
                out.push_str(&format!("<td>{}</td>", escape_html(&value)));
            }
            out.push_str("</tr>\n");
        }

        out.push_str("</tbody>\n</table>\n");
    }

    fn render_kv_table(&self, out: &mut String, block: &KeyValueBlock, data: &Value) {
        out.push_str("<table class=\"kv-table\">\n<tbody>\n");
        for row in &block.rows {
            let value = resolve_path(data, &row.path)
                .map(display_value)
                .unwrap_or_default();
            out.push_str(&format!(
                "<tr><td class=\"kv-label\">{}</td><td>{}</td></tr>\n",
                escape_html(&row.label),
                escape_html(&value)
            ));
        }
        out.push_str("</tbody>\n</table>\n");
    }

    fn render_kv_list(&self, out: &mut String, block: &KeyValueBlock, data: &Value) {
        out.push_str("<div class=\"kv-list\">\n");
        for row in &block.rows {
            let value = resolve_path(data, &row.path)
                .map(display_value)
                .unwrap_or_default();
            out.push_str(&format!(
                "<div class=\"kv-row\"><span class=\"kv-label\">{}</span><span class=\"kv-value\">{}</span></div>\n",
                escape_html(&row.label),
                escape_html(&value)
            ));
        }
        out.push_str("</div>\n");
    }

    fn render_signature(&self, out: &mut String, block: &SignatureBlock, data: &Value) {
        out.push_str("<div class=\"signature\">\n");
        if block.regards {
            out.push_str("<p>Regards,</p>\n");
        }

        let name = resolve_optional(block.name.as_deref(), block.name_path.as_deref(), data);
        if let Some(name) = name {
            out.push_str(&format!("<p class=\"signature-name\">{name}</p>\n"));
        }

        let title = resolve_optional(block.title.as_deref(), block.title_path.as_deref(), data);
        if let Some(title) = title {
            out.push_str(&format!("<p class=\"signature-title\">{title}</p>\n"));
        }

        out.push_str("</div>\n");
    }

    fn wrap_document(&self, body: &str) -> String {
        let title = self
            .config
            .title
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "Document".to_string());

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{BASE_STYLESHEET}\n</style>\n</head>\n<body{}>\n{body}</body>\n</html>\n",
            style_attr(self.sheet_style("document"))
        )
    }
}

/// Resolve block text: a bind path wins when no literal text is given;
/// literal text goes through placeholder substitution. Both absent
/// renders empty.
fn resolve_text(text: Option<&str>, path: Option<&str>, data: &Value) -> String {
    match (text, path) {
        (None, Some(path)) => {
            let value = resolve_path(data, path)
                .map(display_value)
                .unwrap_or_default();
            escape_html(&value)
        }
        (Some(text), _) => substitute(text, data),
        (None, None) => String::new(),
    }
}

/// Resolve an optional literal-or-bound field; `None` when neither is set
fn resolve_optional(text: Option<&str>, path: Option<&str>, data: &Value) -> Option<String> {
    match (text, path) {
        (Some(text), _) => Some(substitute(text, data)),
        (None, Some(path)) => {
            let value = resolve_path(data, path)
                .map(display_value)
                .unwrap_or_default();
            Some(escape_html(&value))
        }
        (None, None) => None,
    }
}

/// Replace `{{path}}` placeholders with resolved, escaped display values.
/// Literal text is escaped as well: no unescaped input reaches the HTML.
fn substitute(text: &str, data: &Value) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        match rest.find("{{") {
            Some(start) => {
                out.push_str(&escape_html(&rest[..start]));
                let after = &rest[start + 2..];
                match after.find("}}") {
                    Some(end) => {
                        let path = after[..end].trim();
                        let value = resolve_path(data, path)
                            .map(display_value)
                            .unwrap_or_default();
                        out.push_str(&escape_html(&value));
                        rest = &after[end + 2..];
                    }
                    None => {
                        // Unterminated placeholder stays literal
                        out.push_str(&escape_html(&rest[start..]));
                        break;
                    }
                }
            }
            None => {
                out.push_str(&escape_html(rest));
                break;
            }
        }
    }

    out
}

/// Build an inline `style` attribute from CSS declarations
fn style_attr(style: Option<&CssStyle>) -> String {
    match style {
        Some(map) if !map.is_empty() => {
            let css = map
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            format!(" style=\"{}\"", escape_html(&css))
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with(blocks: Vec<TemplateBlock>) -> TemplateConfig {
        TemplateConfig {
            title: None,
            styles: Default::default(),
            blocks,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_substitute_resolves_and_escapes() {
        let data = json!({ "name": "<Acme>" });
        assert_eq!(
            substitute("Hello {{name}}!", &data),
            "Hello &lt;Acme&gt;!"
        );
    }

    #[test]
    fn test_substitute_missing_path_is_empty() {
        let data = json!({});
        assert_eq!(substitute("[{{missing.path}}]", &data), "[]");
    }

    #[test]
    fn test_substitute_unterminated_placeholder() {
        let data = json!({ "a": 1 });
        assert_eq!(substitute("x {{a", &data), "x {{a");
    }

    #[test]
    fn test_paragraph_missing_path_renders_empty() {
        let config = config_with(vec![TemplateBlock::Paragraph(ParagraphBlock {
            path: Some("does.not.exist".to_string()),
            ..Default::default()
        })]);

        let html = render(&config, &json!({}));
        assert!(html.contains("<p></p>"));
    }

    #[test]
    fn test_heading_style_precedence() {
        let mut styles = BTreeMap::new();
        let mut h2_style = CssStyle::new();
        h2_style.insert("color".to_string(), StyleValue::Text("red".to_string()));
        styles.insert("h2".to_string(), h2_style);

        let config = TemplateConfig {
            title: None,
            styles,
            blocks: vec![TemplateBlock::Heading(HeadingBlock {
                text: Some("Section".to_string()),
                level: 2,
                ..Default::default()
            })],
        };

        let html = render(&config, &json!({}));
        assert!(html.contains("<h2 style=\"color: red\">Section</h2>"));
    }

    #[test]
    fn test_table_without_path_uses_data_as_single_row() {
        let config = config_with(vec![TemplateBlock::Table(TableBlock {
            path: None,
            columns: vec![TableColumn {
                header: "Name".to_string(),
                path: "name".to_string(),
            }],
        })]);

        let html = render(&config, &json!({ "name": "Acme" }));
        assert!(html.contains("<td>Acme</td>"));
    }

    #[test]
    fn test_list_flattens_bound_arrays_in_static_items() {
        let config = config_with(vec![TemplateBlock::List(ListBlock {
            path: None,
            ordered: true,
            items: vec![
                Segment::Literal("first".to_string()),
                Segment::Bound(BindRef {
                    path: "extras".to_string(),
                }),
            ],
        })]);

        let html = render(&config, &json!({ "extras": ["a", "b"] }));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<li>first</li>"));
        assert!(html.contains("<li>a</li>"));
        assert!(html.contains("<li>b</li>"));
    }

    #[test]
    fn test_signature_with_bound_name() {
        let config = config_with(vec![TemplateBlock::Signature(SignatureBlock {
            name_path: Some("signer".to_string()),
            title: Some("Director".to_string()),
            ..Default::default()
        })]);

        let html = render(&config, &json!({ "signer": "Jo Harper" }));
        assert!(html.contains("<p>Regards,</p>"));
        assert!(html.contains("<p class=\"signature-name\">Jo Harper</p>"));
        assert!(html.contains("<p class=\"signature-title\">Director</p>"));
    }

    #[test]
    fn test_empty_config_renders_empty_body() {
        let html = render(&config_with(Vec::new()), &json!({}));
        assert!(html.contains("<body>\n</body>"));
    }

    #[test]
    fn test_data_is_normalized_before_binding() {
        let config = config_with(vec![TemplateBlock::Paragraph(ParagraphBlock {
            path: Some("nested.a".to_string()),
            ..Default::default()
        })]);

        // The nested object arrives JSON-encoded
        let html = render(&config, &json!({ "nested": "{\"a\": \"inner\"}" }));
        assert!(html.contains("<p>inner</p>"));
    }
}
