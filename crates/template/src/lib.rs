//! Template engine - document DSL, schema compilation and HTML rendering
//!
//! This crate provides:
//! - Template config types (`TemplateConfig`, `TemplateBlock`)
//! - Config parsing from JSON
//! - Automatic template derivation from a JSON-Schema-like field description
//! - Data binding via dot-separated paths
//! - HTML rendering with a print-oriented stylesheet
//!
//! # Example
//!
//! ```ignore
//! use template::{parse_config, render};
//!
//! let config = parse_config(config_json)?;
//! let data: serde_json::Value = serde_json::from_str(data_json)?;
//! let html = render(&config, &data);
//! ```

pub mod compiler;
pub mod normalize;
pub mod parser;
mod renderer;
mod schema;

pub use compiler::{compile_schema, SchemaNode, SchemaType};
pub use normalize::normalize;
pub use parser::{display_value, parse_config, resolve_path};
pub use renderer::{escape_html, render, HtmlRenderer};
pub use schema::*;

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template config: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
