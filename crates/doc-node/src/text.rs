//! Plain-text extraction from markup
//!
//! These helpers back the converter's degradation path: when structured
//! scanning cannot proceed, the input is reduced to tag-stripped,
//! blank-line-delimited paragraphs.

use crate::nodes::{DocNode, ParagraphNode};

/// Tags whose end (or, for `br`, presence) marks a paragraph boundary
/// when stripping markup to plain text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "table", "ul", "ol", "section",
    "article", "blockquote",
];

/// Remove all tags, turning block-element boundaries into blank lines
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in html.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                let name = tag_name(&tag);
                let closing = tag.starts_with('/');
                if name == "br" || (closing && BLOCK_TAGS.contains(&name.as_str())) {
                    out.push_str("\n\n");
                }
                tag.clear();
            } else {
                tag.push(ch);
            }
        } else if ch == '<' {
            in_tag = true;
        } else {
            out.push(ch);
        }
    }

    out
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Decode the handful of entities the renderer and common markup emit
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Split plain text on blank lines into trimmed, whitespace-collapsed
/// paragraph strings; empty segments are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    decode_entities(text)
        .split("\n\n")
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Reduce arbitrary markup to paragraph nodes - the converter's fallback
pub fn plain_text_nodes(html: &str) -> Vec<DocNode> {
    paragraphs(&strip_tags(html))
        .into_iter()
        .map(|text| DocNode::Paragraph(ParagraphNode { text, bold: false }))
        .collect()
}
