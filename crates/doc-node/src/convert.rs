//! HTML to document-node conversion
//!
//! A single forward pass over the markup. Plain text accumulates in a
//! buffer; structural elements (table, heading, list, image) flush the
//! buffer as paragraphs and emit their node, so output order matches
//! document order. Closing-tag pairing is first-occurrence, not
//! nesting-aware. Any structural failure degrades the whole input to
//! tag-stripped paragraphs - callers always get a usable node list.

use base64::Engine;

use crate::nodes::*;
use crate::text::{paragraphs, plain_text_nodes, strip_tags};
use crate::ConvertError;

/// Convert an HTML fragment or document into an ordered node list
pub fn convert(html: &str) -> Vec<DocNode> {
    let cleaned = remove_style_blocks(html);
    match scan(&cleaned) {
        Ok(nodes) => nodes,
        Err(err) => {
            log::debug!("structured conversion failed ({err}); falling back to plain text");
            plain_text_nodes(&cleaned)
        }
    }
}

/// Drop `<style>` elements wholesale so CSS never leaks into output text
fn remove_style_blocks(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find("<style") {
        let start = pos + rel;
        out.push_str(&html[pos..start]);
        pos = match lower[start..].find("</style") {
            Some(close_rel) => {
                let close = start + close_rel;
                lower[close..]
                    .find('>')
                    .map(|gt| close + gt + 1)
                    .unwrap_or(lower.len())
            }
            // Unterminated style swallows the rest
            None => lower.len(),
        };
    }

    out.push_str(&html[pos..]);
    out
}

fn scan(input: &str) -> Result<Vec<DocNode>, ConvertError> {
    let mut scanner = Scanner::new(input);

    while scanner.pos < input.len() {
        match input[scanner.pos..].find('<') {
            None => {
                let text = &input[scanner.pos..];
                scanner.pos = input.len();
                scanner.push_text(text);
            }
            Some(offset) => {
                let text = &input[scanner.pos..scanner.pos + offset];
                scanner.pos += offset;
                scanner.push_text(text);
                scanner.handle_tag()?;
            }
        }
    }

    scanner.flush_text();
    Ok(scanner.nodes)
}

struct Scanner<'a> {
    input: &'a str,
    /// ASCII-lowercased shadow of `input`; byte offsets are identical
    lower: String,
    pos: usize,
    text: String,
    nodes: Vec<DocNode>,
    bold_open: bool,
    bold_all: bool,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            lower: input.to_ascii_lowercase(),
            pos: 0,
            text: String::new(),
            nodes: Vec::new(),
            bold_open: false,
            bold_all: false,
        }
    }

    fn push_text(&mut self, s: &str) {
        if !self.bold_open && !s.trim().is_empty() {
            self.bold_all = false;
        }
        self.text.push_str(s);
    }

    /// Emit the pending text buffer as paragraph nodes; returns how many
    fn flush_text(&mut self) -> usize {
        let parts = paragraphs(&self.text);
        self.text.clear();
        let bold = self.bold_all;
        self.bold_all = false;
        let count = parts.len();
        for text in parts {
            self.nodes.push(DocNode::Paragraph(ParagraphNode { text, bold }));
        }
        count
    }

    /// Parse the tag at `pos`; `(name, closing, end-after-'>')`
    fn read_tag(&self) -> Option<(String, bool, usize)> {
        let rest = &self.lower[self.pos..];
        let gt = rest.find('>')?;
        let inner = &rest[1..gt];
        let closing = inner.starts_with('/');
        let name: String = inner
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        Some((name, closing, self.pos + gt + 1))
    }

    /// Find the first closing tag for `name` at or after `from`;
    /// `(close-tag start, end-after-'>')`
    fn find_close(&self, name: &str, from: usize) -> Option<(usize, usize)> {
        let needle = format!("</{name}");
        let mut search = from;
        while let Some(rel) = self.lower[search..].find(&needle) {
            let start = search + rel;
            let after_name = start + needle.len();
            match self.lower[after_name..].chars().next() {
                Some(c) if c == '>' || c.is_ascii_whitespace() => {
                    let gt = self.lower[after_name..].find('>')?;
                    return Some((start, after_name + gt + 1));
                }
                None => return None,
                // Partial match like "</ph" when looking for "</p"
                _ => search = after_name,
            }
        }
        None
    }

    /// Content slice of the element whose open tag ends at `content_start`
    fn element_inner(
        &self,
        content_start: usize,
        name: &str,
    ) -> Result<(&'a str, usize), ConvertError> {
        let input = self.input;
        match self.find_close(name, content_start) {
            Some((close_start, after)) => Ok((&input[content_start..close_start], after)),
            None => Err(ConvertError::Unterminated(name.to_string())),
        }
    }

    fn handle_tag(&mut self) -> Result<(), ConvertError> {
        let rest = &self.input[self.pos..];

        if rest.starts_with("<!--") {
            self.pos = match self.lower[self.pos..].find("-->") {
                Some(rel) => self.pos + rel + 3,
                None => self.input.len(),
            };
            return Ok(());
        }
        if rest.starts_with("<!") {
            self.pos = match self.lower[self.pos..].find('>') {
                Some(rel) => self.pos + rel + 1,
                None => self.input.len(),
            };
            return Ok(());
        }

        let (name, closing, tag_end) = match self.read_tag() {
            Some(tag) => tag,
            // No '>' ahead: malformed trailing tag, dropped like a strip
            None => {
                self.pos = self.input.len();
                return Ok(());
            }
        };

        // A bare '<' that opens no tag stays literal text
        if name.is_empty() {
            self.push_text("<");
            self.pos += 1;
            return Ok(());
        }

        if closing {
            match name.as_str() {
                "p" | "div" => {
                    self.flush_text();
                }
                "b" | "strong" => self.bold_open = false,
                _ => {}
            }
            self.pos = tag_end;
            return Ok(());
        }

        match name.as_str() {
            "table" => {
                let (inner, after) = self.element_inner(tag_end, "table")?;
                self.flush_text();
                self.nodes.push(DocNode::Table(parse_table(inner)));
                self.pos = after;
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name.as_bytes()[1] - b'0';
                let (inner, after) = self.element_inner(tag_end, &name)?;
                self.flush_text();
                let text = paragraphs(&strip_tags(inner)).join(" ");
                self.nodes.push(DocNode::Heading(HeadingNode { text, level }));
                self.pos = after;
            }
            "ul" | "ol" => {
                let ordered = name == "ol";
                let (inner, after) = self.element_inner(tag_end, &name)?;
                self.flush_text();
                self.nodes.extend(parse_list(inner, ordered));
                self.pos = after;
            }
            "img" => {
                self.flush_text();
                let tag_text = &self.input[self.pos..tag_end];
                let node = img_src(tag_text)
                    .and_then(|src| decode_data_uri(&src))
                    .map(|(bytes, mime)| DocNode::Image(ImageNode { bytes, mime }))
                    .unwrap_or_else(|| DocNode::paragraph("[Image]"));
                self.nodes.push(node);
                self.pos = tag_end;
            }
            // Paragraph boundaries; content between them flows as text
            "p" | "div" => {
                self.flush_text();
                self.pos = tag_end;
            }
            "br" => {
                // A line break with nothing pending still marks a break
                if self.flush_text() == 0 {
                    self.nodes.push(DocNode::paragraph(""));
                }
                self.pos = tag_end;
            }
            "b" | "strong" => {
                if self.text.trim().is_empty() {
                    self.bold_all = true;
                }
                self.bold_open = true;
                self.pos = tag_end;
            }
            // Unknown tags are stripped; their content remains as text
            _ => self.pos = tag_end,
        }

        Ok(())
    }
}

fn parse_table(inner: &str) -> TableNode {
    let lower = inner.to_ascii_lowercase();
    let mut rows = Vec::new();
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find("<tr") {
        let tr_start = pos + rel;
        let content_start = match lower[tr_start..].find('>') {
            Some(gt) => tr_start + gt + 1,
            None => break,
        };
        let (row_end, next_pos) = match lower[content_start..].find("</tr") {
            Some(close_rel) => {
                let close = content_start + close_rel;
                let after = lower[close..]
                    .find('>')
                    .map(|gt| close + gt + 1)
                    .unwrap_or(lower.len());
                (close, after)
            }
            None => (lower.len(), lower.len()),
        };
        rows.push(parse_cells(&inner[content_start..row_end]));
        pos = next_pos;
    }

    TableNode { rows }
}

fn parse_cells(row: &str) -> Vec<CellNode> {
    let lower = row.to_ascii_lowercase();
    let mut cells = Vec::new();
    let mut pos = 0;

    loop {
        let next_cell = ["<td", "<th"]
            .iter()
            .filter_map(|needle| lower[pos..].find(needle))
            .min();
        let cell_start = match next_cell {
            Some(rel) => pos + rel,
            None => break,
        };
        let content_start = match lower[cell_start..].find('>') {
            Some(gt) => cell_start + gt + 1,
            None => break,
        };
        let end_rel = ["</td", "</th", "<td", "<th"]
            .iter()
            .filter_map(|needle| lower[content_start..].find(needle))
            .min()
            .unwrap_or(lower.len() - content_start);
        let content_end = content_start + end_rel;

        let text = paragraphs(&strip_tags(&row[content_start..content_end])).join(" ");
        cells.push(CellNode { text });
        pos = content_end;
    }

    cells
}

fn parse_list(inner: &str, ordered: bool) -> Vec<DocNode> {
    let lower = inner.to_ascii_lowercase();
    let mut items = Vec::new();
    let mut pos = 0;
    let mut index = 1;

    while let Some(rel) = lower[pos..].find("<li") {
        let li_start = pos + rel;
        let content_start = match lower[li_start..].find('>') {
            Some(gt) => li_start + gt + 1,
            None => break,
        };
        let end_rel = [
            lower[content_start..].find("</li"),
            lower[content_start..].find("<li"),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(lower.len() - content_start);
        let content_end = content_start + end_rel;

        let text = paragraphs(&strip_tags(&inner[content_start..content_end])).join(" ");
        items.push(DocNode::ListItem(ListItemNode {
            text,
            ordered,
            index,
        }));
        index += 1;
        pos = content_end;
    }

    items
}

/// Extract the `src` attribute from an `<img>` tag
fn img_src(tag: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let at = lower.find("src")?;
    let rest = tag[at + 3..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next()?;

    if quote == '"' || quote == '\'' {
        let inner = &rest[1..];
        let end = inner.find(quote)?;
        Some(inner[..end].to_string())
    } else {
        Some(
            rest.split(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                .next()
                .unwrap_or_default()
                .to_string(),
        )
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI
fn decode_data_uri(src: &str) -> Option<(Vec<u8>, String)> {
    let rest = src.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    Some((bytes, mime.to_string()))
}
