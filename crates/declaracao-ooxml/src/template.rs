//! Template loading and re-packing for DOCX files
//!
//! A [`Template`] couples the unpacked archive with the parsed main
//! document so callers can edit paragraphs and write a new DOCX.
//!
//! # Example
//!
//! ```no_run
//! use declaracao_ooxml::Template;
//!
//! let bytes = std::fs::read("modelo.docx")?;
//! let mut template = Template::from_bytes(&bytes)?;
//! for mut paragraph in template.document_mut().paragraphs_mut() {
//!     let text = paragraph.text().replace("{{NOME}}", "Maria");
//!     paragraph.set_text(&text);
//! }
//! template.save("preenchido.docx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use crate::archive::{OoxmlArchive, DOCUMENT_PART};
use crate::document::Document;
use crate::error::Result;

/// A DOCX template with its main document parsed for editing
#[derive(Debug, Clone)]
pub struct Template {
    /// The underlying OOXML archive
    archive: OoxmlArchive,
    /// Parsed word/document.xml
    document: Document,
}

impl Template {
    /// Load a template from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let archive = OoxmlArchive::open(path)?;
        Self::from_archive(archive)
    }

    /// Load a template from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let archive = OoxmlArchive::from_bytes(bytes)?;
        Self::from_archive(archive)
    }

    /// Parse the main document of an already unpacked archive
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let document = Document::parse(archive.document_xml()?)?;
        Ok(Self { archive, document })
    }

    /// The parsed main document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The parsed main document, for editing
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Get a reference to the underlying archive
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Serialize the edited document back into a DOCX byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.packed_archive()?.to_bytes()
    }

    /// Serialize the edited document into a DOCX file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.packed_archive()?.write_to_file(path)
    }

    fn packed_archive(&self) -> Result<OoxmlArchive> {
        let mut archive = self.archive.clone();
        archive.set_part(DOCUMENT_PART, self.document.to_xml()?);
        Ok(archive)
    }
}
