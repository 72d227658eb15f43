//! PDF emission
//!
//! The primary path hands the rendered HTML to an external print engine
//! through the `PrintEngine` trait. When no engine is configured, or the
//! engine fails, a minimal text-only PDF is assembled with `lopdf`, so a
//! PDF always comes back.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

/// Errors from an external print engine
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Print engine error: {0}")]
    Engine(String),
}

/// An external HTML print capability
pub trait PrintEngine {
    /// Render an HTML document to PDF bytes
    fn print_html(&self, html: &str) -> Result<Vec<u8>, PdfError>;
}

/// PDF emitter with an optional external engine
#[derive(Default)]
pub struct PdfEmitter {
    engine: Option<Box<dyn PrintEngine>>,
}

impl PdfEmitter {
    /// Create an emitter with no external engine; every document goes
    /// through the text-only fallback
    pub fn new() -> Self {
        Self { engine: None }
    }

    /// Create an emitter backed by an external print engine
    pub fn with_engine(engine: Box<dyn PrintEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Emit a PDF for the given HTML; never fails
    pub fn emit(&self, html: &str) -> Vec<u8> {
        if let Some(engine) = &self.engine {
            match engine.print_html(html) {
                Ok(bytes) => return bytes,
                Err(err) => {
                    log::warn!("print engine failed ({err}), falling back to text-only PDF");
                }
            }
        }
        text_fallback_pdf(html)
    }
}

// Letter page, 1-inch margins, fixed type
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const FONT_SIZE: i64 = 11;
const LINE_HEIGHT: f32 = 14.0;
const MAX_CHARS_PER_LINE: usize = 90;

/// Render the tag-stripped plain text of `html` onto a single page.
/// Text past the bottom margin is dropped.
pub fn text_fallback_pdf(html: &str) -> Vec<u8> {
    let text = doc_node::strip_tags(html);

    let max_lines = ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize;
    let lines: Vec<String> = doc_node::paragraphs(&text)
        .iter()
        .flat_map(|paragraph| wrap_plain(paragraph, MAX_CHARS_PER_LINE))
        .take(max_lines)
        .collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LINE_HEIGHT.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - LINE_HEIGHT).into()],
        ),
    ];
    for line in &lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.as_str())],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().unwrap_or_default(),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    if let Err(err) = doc.save_to(&mut bytes) {
        log::error!("failed to serialize fallback PDF: {err}");
    }
    bytes
}

/// Greedy word wrap at a character budget
fn wrap_plain(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_chars {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
