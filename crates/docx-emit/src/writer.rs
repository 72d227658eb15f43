//! DOCX document generation
//!
//! Translates a `DocNode` sequence into `word/document.xml` plus the
//! relationships and media parts images need, then hands everything to
//! the archive for packaging.

use doc_node::{DocNode, HeadingNode, ImageNode, ListItemNode, ParagraphNode, TableNode};

use crate::archive::OoxmlArchive;
use crate::parts;
use crate::{DocxError, Result};

/// Page content width available to images: 6.5in in EMUs
const MAX_IMAGE_WIDTH_EMU: i64 = 5_943_600;

/// EMUs per pixel at 96 DPI
const EMU_PER_PIXEL: i64 = 9_525;

/// DOCX writer for generating documents from a node sequence
pub struct DocxWriter {
    /// XML output buffer for word/document.xml
    output: String,
    /// Image relationship targets, in rId order after the fixed rels
    image_targets: Vec<String>,
    /// Media files to embed (path, bytes)
    media_files: Vec<(String, Vec<u8>)>,
    /// Next image ID for unique naming
    next_image_id: usize,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self {
            output: String::new(),
            image_targets: Vec::new(),
            media_files: Vec::new(),
            next_image_id: 1,
        }
    }

    /// Generate a DOCX file from a node sequence
    pub fn generate(mut self, nodes: &[DocNode]) -> Result<Vec<u8>> {
        let document_xml = self.generate_document_xml(nodes)?;

        let mut archive = OoxmlArchive::new();
        archive.set_string("[Content_Types].xml", parts::content_types());
        archive.set_string("_rels/.rels", parts::package_rels());
        archive.set_string("docProps/core.xml", parts::core_properties());
        archive.set_string("word/styles.xml", parts::styles());
        archive.set_string("word/numbering.xml", parts::numbering());
        archive.set_string("word/document.xml", document_xml);
        archive.set_string("word/_rels/document.xml.rels", self.document_rels());

        for (path, data) in std::mem::take(&mut self.media_files) {
            archive.set(path, data);
        }

        archive.into_bytes()
    }

    /// Generate the complete document.xml content
    fn generate_document_xml(&mut self, nodes: &[DocNode]) -> Result<String> {
        self.output.clear();
        self.output
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(r#"<w:document "#);
        self.output
            .push_str(r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#);
        self.output.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        self.output.push_str(
            r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
        );
        self.output
            .push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        self.output
            .push_str(r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#);
        self.output.push('\n');
        self.output.push_str("<w:body>\n");

        for node in nodes {
            self.generate_node(node)?;
        }

        // A body with no content still needs one paragraph
        if nodes.is_empty() {
            self.output.push_str("<w:p/>\n");
        }

        // One section, Letter page, 1-inch margins
        self.output.push_str("<w:sectPr>\n");
        self.output
            .push_str("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>\n");
        self.output.push_str(
            "<w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>\n",
        );
        self.output.push_str("</w:sectPr>\n");

        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");

        Ok(self.output.clone())
    }

    fn generate_node(&mut self, node: &DocNode) -> Result<()> {
        match node {
            DocNode::Paragraph(para) => self.generate_paragraph(para),
            DocNode::Heading(heading) => self.generate_heading(heading),
            DocNode::ListItem(item) => self.generate_list_item(item),
            DocNode::Table(table) => self.generate_table(table),
            DocNode::Image(image) => self.generate_image(image)?,
        }
        Ok(())
    }

    fn generate_paragraph(&mut self, para: &ParagraphNode) {
        self.output.push_str("<w:p>\n");
        self.output
            .push_str("<w:pPr><w:pStyle w:val=\"Normal\"/></w:pPr>\n");
        self.output.push_str("<w:r>");
        if para.bold {
            self.output.push_str("<w:rPr><w:b/></w:rPr>");
        }
        self.output.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            xml_escape(&para.text)
        ));
        self.output.push_str("</w:r>\n");
        self.output.push_str("</w:p>\n");
    }

    fn generate_heading(&mut self, heading: &HeadingNode) {
        let level = heading.level.clamp(1, 6);
        self.output.push_str("<w:p>\n");
        self.output.push_str(&format!(
            "<w:pPr><w:pStyle w:val=\"Heading{level}\"/></w:pPr>\n"
        ));
        self.output.push_str(&format!(
            "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>\n",
            xml_escape(&heading.text)
        ));
        self.output.push_str("</w:p>\n");
    }

    fn generate_list_item(&mut self, item: &ListItemNode) {
        let num_id = if item.ordered { 2 } else { 1 };
        self.output.push_str("<w:p>\n");
        self.output.push_str("<w:pPr>\n");
        self.output
            .push_str("<w:pStyle w:val=\"ListParagraph\"/>\n");
        self.output.push_str(&format!(
            "<w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"{num_id}\"/></w:numPr>\n"
        ));
        self.output.push_str("</w:pPr>\n");
        self.output.push_str(&format!(
            "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>\n",
            xml_escape(&item.text)
        ));
        self.output.push_str("</w:p>\n");
    }

    fn generate_table(&mut self, table: &TableNode) {
        self.output.push_str("<w:tbl>\n");
        self.output.push_str("<w:tblPr>\n");
        self.output
            .push_str("<w:tblStyle w:val=\"TableGrid\"/>\n");
        self.output
            .push_str("<w:tblW w:w=\"5000\" w:type=\"pct\"/>\n");
        self.output.push_str("</w:tblPr>\n");

        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns > 0 {
            self.output.push_str("<w:tblGrid>\n");
            for _ in 0..columns {
                self.output.push_str("<w:gridCol w:w=\"2000\"/>\n");
            }
            self.output.push_str("</w:tblGrid>\n");
        }

        for row in &table.rows {
            self.output.push_str("<w:tr>\n");
            for cell in row {
                self.output.push_str("<w:tc>\n");
                self.output.push_str("<w:tcPr/>\n");
                self.output.push_str(&format!(
                    "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
                    xml_escape(&cell.text)
                ));
                self.output.push_str("</w:tc>\n");
            }
            self.output.push_str("</w:tr>\n");
        }

        self.output.push_str("</w:tbl>\n");
    }

    fn generate_image(&mut self, image: &ImageNode) -> Result<()> {
        let extension = match image.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpeg",
            other => {
                return Err(DocxError::Image(format!(
                    "unsupported image type: {other}"
                )))
            }
        };

        let decoded = image::load_from_memory(&image.bytes)
            .map_err(|e| DocxError::Image(e.to_string()))?;
        let mut cx = decoded.width() as i64 * EMU_PER_PIXEL;
        let mut cy = decoded.height() as i64 * EMU_PER_PIXEL;
        if cx > MAX_IMAGE_WIDTH_EMU {
            cy = cy * MAX_IMAGE_WIDTH_EMU / cx;
            cx = MAX_IMAGE_WIDTH_EMU;
        }

        let image_id = self.next_image_id;
        self.next_image_id += 1;

        let media_path = format!("word/media/image{image_id}.{extension}");
        self.media_files.push((media_path, image.bytes.clone()));

        let rel_id = self.add_image_rel(format!("media/image{image_id}.{extension}"));

        self.generate_drawing_xml(image_id, &rel_id, cx, cy);
        Ok(())
    }

    /// Register an image relationship; returns its rId
    fn add_image_rel(&mut self, target: String) -> String {
        self.image_targets.push(target);
        // rId1/rId2 are styles and numbering
        format!("rId{}", self.image_targets.len() + 2)
    }

    /// Generate the `<w:drawing>` XML for an embedded image
    fn generate_drawing_xml(&mut self, drawing_id: usize, rel_id: &str, cx: i64, cy: i64) {
        self.output.push_str("<w:p>\n<w:r>\n<w:drawing>\n");
        self.output.push_str(&format!(
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">
<wp:extent cx="{cx}" cy="{cy}"/>
<wp:docPr id="{drawing_id}" name="Image {drawing_id}"/>
<a:graphic>
<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">
<pic:pic>
<pic:nvPicPr><pic:cNvPr id="{drawing_id}" name="Image"/><pic:cNvPicPr/></pic:nvPicPr>
<pic:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>
<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>
</pic:pic>
</a:graphicData>
</a:graphic>
</wp:inline>
"#
        ));
        self.output.push_str("</w:drawing>\n</w:r>\n</w:p>\n");
    }

    /// Generate word/_rels/document.xml.rels
    fn document_rels(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
"#,
        );
        for (index, target) in self.image_targets.iter().enumerate() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>
"#,
                index + 3,
                xml_escape(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Escape text for XML emission
fn xml_escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
