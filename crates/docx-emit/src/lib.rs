//! DOCX emission
//!
//! Packages a `DocNode` sequence into a DOCX (OOXML) archive built from
//! scratch: one section, 1-inch margins, Calibri 11pt defaults. Packaging
//! failures propagate; an empty node list still yields a valid document.
//!
//! # Example
//!
//! ```ignore
//! use doc_node::convert;
//! use docx_emit::emit_docx;
//!
//! let nodes = convert(&html);
//! let bytes = emit_docx(&nodes)?;
//! std::fs::write("output.docx", bytes)?;
//! ```

mod archive;
mod parts;
mod writer;

pub use archive::OoxmlArchive;
pub use writer::DocxWriter;

use thiserror::Error;

/// Errors that can occur while packaging a DOCX file
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(String),
}

/// Result type for DOCX operations
pub type Result<T> = std::result::Result<T, DocxError>;

/// Package a node sequence into DOCX bytes
pub fn emit_docx(nodes: &[doc_node::DocNode]) -> Result<Vec<u8>> {
    DocxWriter::new().generate(nodes)
}
