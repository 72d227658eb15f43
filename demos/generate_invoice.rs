//! Generic document generator
//!
//! Renders a document from a template config (or a form schema) and
//! input data, writing HTML, DOCX and PDF outputs.
//!
//! Usage:
//!   cargo run --example generate_invoice -- <config.json|schema.json> <input.json> [output-stem]
//!
//! When the first file has no "blocks" key it is treated as a form
//! schema and a template is derived from it.

use std::path::Path;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <config.json|schema.json> <input.json> [output-stem]", args[0]);
        std::process::exit(1);
    }

    let template_path = &args[1];
    let input_path = &args[2];

    // Derive output stem from the template file name if not provided
    let output_stem = if args.len() > 3 {
        args[3].clone()
    } else {
        let name = Path::new(template_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        format!("output/{name}")
    };

    if let Some(parent) = Path::new(&output_stem).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let template_json = std::fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template '{template_path}'"))?;

    // An authored config has blocks; anything else is compiled as a schema
    let parsed: serde_json::Value = serde_json::from_str(&template_json)?;
    let config = if parsed.get("blocks").is_some() {
        template::parse_config(&template_json)?
    } else {
        let schema: template::SchemaNode = serde_json::from_str(&template_json)?;
        template::compile_schema(&schema)
    };

    let input_json = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input '{input_path}'"))?;
    let data: serde_json::Value = serde_json::from_str(&input_json)?;

    let html = template::render(&config, &data);
    std::fs::write(format!("{output_stem}.html"), &html)?;

    let nodes = doc_node::convert(&html);
    let docx = docx_emit::emit_docx(&nodes)?;
    std::fs::write(format!("{output_stem}.docx"), docx)?;

    let pdf = pdf_emit::PdfEmitter::new().emit(&html);
    std::fs::write(format!("{output_stem}.pdf"), pdf)?;

    println!("Generated: {output_stem}.html / .docx / .pdf");

    Ok(())
}
