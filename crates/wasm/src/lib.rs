//! WASM bindings for formdoc
//!
//! This crate provides a JavaScript-friendly API for:
//! - Loading a template config (or deriving one from a form schema)
//! - Rendering HTML previews from form data
//! - Generating DOCX and PDF files
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { DocumentTemplate } from 'formdoc-wasm';
//!
//! await init();
//!
//! // Load an authored template...
//! const template = DocumentTemplate.fromJson(configJson);
//!
//! // ...or derive one from the form's schema
//! // const template = DocumentTemplate.fromSchema(schema);
//!
//! const html = template.renderHtml({ name: "Test" });
//! const docx = template.generateDocx({ name: "Test" });
//! ```

use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Document template renderer
#[wasm_bindgen]
pub struct DocumentTemplate {
    config: template::TemplateConfig,
}

#[wasm_bindgen]
impl DocumentTemplate {
    /// Load a template config from JSON
    ///
    /// @param json - Template config JSON string
    /// @returns DocumentTemplate instance
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<DocumentTemplate, JsValue> {
        let config =
            template::parse_config(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(DocumentTemplate { config })
    }

    /// Derive a template from a JSON-Schema-like form description
    ///
    /// @param schema - Schema object
    /// @returns DocumentTemplate instance
    #[wasm_bindgen(js_name = fromSchema)]
    pub fn from_schema(schema: JsValue) -> Result<DocumentTemplate, JsValue> {
        let schema: template::SchemaNode =
            serde_wasm_bindgen::from_value(schema).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(DocumentTemplate {
            config: template::compile_schema(&schema),
        })
    }

    /// Serialize the current config to JSON
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(&self.config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render an HTML preview with form data
    ///
    /// @param data - Data object for binding
    /// @returns HTML document string
    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self, data: JsValue) -> Result<String, JsValue> {
        let data: serde_json::Value = serde_wasm_bindgen::from_value(data)?;
        Ok(template::render(&self.config, &data))
    }

    /// Generate a DOCX file with form data
    ///
    /// @param data - Data object for binding
    /// @returns DOCX bytes (Uint8Array)
    #[wasm_bindgen(js_name = generateDocx)]
    pub fn generate_docx(&self, data: JsValue) -> Result<Vec<u8>, JsValue> {
        let data: serde_json::Value = serde_wasm_bindgen::from_value(data)?;
        let html = template::render(&self.config, &data);
        let nodes = doc_node::convert(&html);
        docx_emit::emit_docx(&nodes).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Generate a PDF file with form data
    ///
    /// @param data - Data object for binding
    /// @returns PDF bytes (Uint8Array)
    #[wasm_bindgen(js_name = generatePdf)]
    pub fn generate_pdf(&self, data: JsValue) -> Result<Vec<u8>, JsValue> {
        let data: serde_json::Value = serde_wasm_bindgen::from_value(data)?;
        let html = template::render(&self.config, &data);
        Ok(pdf_emit::PdfEmitter::new().emit(&html))
    }
}

/// Convert an HTML fragment to a DOCX file directly
///
/// @param html - HTML string (renderer output or hand-authored)
/// @returns DOCX bytes (Uint8Array)
#[wasm_bindgen(js_name = htmlToDocx)]
pub fn html_to_docx(html: &str) -> Result<Vec<u8>, JsValue> {
    let nodes = doc_node::convert(html);
    docx_emit::emit_docx(&nodes).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_from_json_and_render() {
        let template = DocumentTemplate::from_json(
            r#"{ "blocks": [{ "type": "paragraph", "text": "hi" }] }"#,
        )
        .unwrap();
        let html = template
            .render_html(serde_wasm_bindgen::to_value(&serde_json::json!({})).unwrap())
            .unwrap();
        assert!(html.contains("<p>hi</p>"));
    }
}
