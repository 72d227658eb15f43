//! OOXML package assembly
//!
//! DOCX files are ZIP archives of XML parts and media resources. This
//! container is write-only: parts are set by path and the archive is
//! serialized once.

use std::collections::BTreeMap;
use std::io::{Cursor, Seek, Write};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::Result;

/// An OOXML package under construction
#[derive(Debug, Default)]
pub struct OoxmlArchive {
    /// All parts in the package, keyed by path; ordered for
    /// deterministic output
    files: BTreeMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or update a part's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Check if a part exists in the package
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Write the package to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (path, contents) in &self.files {
            zip.start_file(path, options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Serialize the package to bytes
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_zip() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("word/document.xml", "<w:document/>");
        archive.set("word/media/image1.png", vec![1, 2, 3]);
        assert!(archive.contains("word/document.xml"));

        let bytes = archive.into_bytes().unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 2);
        let mut contents = String::new();
        std::io::Read::read_to_string(
            &mut zip.by_name("word/document.xml").unwrap(),
            &mut contents,
        )
        .unwrap();
        assert_eq!(contents, "<w:document/>");
    }
}
