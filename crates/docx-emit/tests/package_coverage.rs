//! Integration tests for DOCX packaging

use std::io::{Cursor, Read};

use doc_node::{convert, DocNode};
use docx_emit::emit_docx;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut part = zip.by_name(name).unwrap();
    let mut contents = String::new();
    part.read_to_string(&mut contents).unwrap();
    contents
}

#[test]
fn test_package_contains_required_parts() {
    let bytes = emit_docx(&[DocNode::paragraph("hello")]).unwrap();

    let mut zip = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();

    for required in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {required}");
    }

    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("hello"));
    assert!(document.contains("<w:pgMar w:top=\"1440\""));
}

#[test]
fn test_converted_html_packages_cleanly() {
    let nodes = convert(
        "<h1>Report</h1><p>Body text</p>\
         <ul><li>one</li><li>two</li></ul>\
         <table><tr><td>a</td><td>b</td></tr></table>",
    );
    let bytes = emit_docx(&nodes).unwrap();

    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("Heading1"));
    assert!(document.contains("ListParagraph"));
    assert!(document.contains("<w:tbl>"));
    assert!(document.contains("Body text"));
}

#[test]
fn test_image_node_embeds_media_part() {
    // 1x1 transparent PNG via the converter's data-URI path
    let html = "<img src=\"data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==\">";
    let nodes = convert(html);
    assert!(matches!(nodes[0], DocNode::Image(_)));

    let bytes = emit_docx(&nodes).unwrap();

    let mut zip = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
    assert!(zip.by_name("word/media/image1.png").is_ok());

    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("<w:drawing>"));
    assert!(document.contains("r:embed=\"rId3\""));

    let rels = read_part(&bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains("media/image1.png"));
}

#[test]
fn test_empty_node_list_is_a_valid_document() {
    let bytes = emit_docx(&[]).unwrap();
    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("<w:p/>"));
}

#[test]
fn test_plain_text_fallback_packages_as_single_run_of_paragraphs() {
    // Markup the converter degrades on still becomes a readable document
    let nodes = convert("<p>intro</p><table><tr><td>never closed");
    assert!(!nodes.is_empty());
    let bytes = emit_docx(&nodes).unwrap();

    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("intro"));
    assert!(!document.contains("<w:tbl>"));
}
