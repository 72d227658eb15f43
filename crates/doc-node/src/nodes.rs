//! Word-processor node model
//!
//! One `DocNode` is one structural unit of a word-processing document.
//! The converter produces the list; a format emitter consumes it once.

/// Structured document content (tagged union)
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    /// Paragraph of text
    Paragraph(ParagraphNode),

    /// Section heading
    Heading(HeadingNode),

    /// One item of a bulleted or numbered list
    ListItem(ListItemNode),

    /// Table of text cells
    Table(TableNode),

    /// Embedded image
    Image(ImageNode),
}

/// A paragraph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphNode {
    pub text: String,
    pub bold: bool,
}

/// A heading
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingNode {
    pub text: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A list item
#[derive(Debug, Clone, PartialEq)]
pub struct ListItemNode {
    pub text: String,
    /// Numbered instead of bulleted
    pub ordered: bool,
    /// 1-based position within its list
    pub index: usize,
}

/// A table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableNode {
    pub rows: Vec<Vec<CellNode>>,
}

/// A table cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellNode {
    pub text: String,
}

/// An embedded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl DocNode {
    /// Plain paragraph node
    pub fn paragraph(text: impl Into<String>) -> Self {
        DocNode::Paragraph(ParagraphNode {
            text: text.into(),
            bold: false,
        })
    }
}
