//! Document node model and HTML conversion
//!
//! This crate provides:
//! - `DocNode`, the structured representation of word-processor content
//! - `convert`, a single-pass HTML scanner producing an ordered node list
//! - Plain-text utilities (`strip_tags`, `plain_text_nodes`) used as the
//!   degradation path when markup defeats the scanner
//!
//! # Example
//!
//! ```ignore
//! use doc_node::convert;
//!
//! let nodes = convert("<h1>Title</h1><p>Body</p>");
//! ```

mod convert;
mod nodes;
mod text;

pub use convert::convert;
pub use nodes::*;
pub use text::{decode_entities, paragraphs, plain_text_nodes, strip_tags};

use thiserror::Error;

/// Internal conversion failures; `convert` catches these and degrades to
/// plain-text extraction instead of surfacing them.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unterminated <{0}> element")]
    Unterminated(String),
}
