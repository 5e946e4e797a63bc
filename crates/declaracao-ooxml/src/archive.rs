//! DOCX package container
//!
//! A DOCX file is a ZIP package of XML parts. The package is unpacked into
//! memory with its entry order kept, so re-packing an edited template
//! writes the parts back in the order the word processor produced them.

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::{OoxmlError, Result};

/// Path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";

/// An unpacked OOXML package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OoxmlArchive {
    /// Parts in package order
    parts: Vec<(String, Vec<u8>)>,
}

impl OoxmlArchive {
    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Unpack a package held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Unpack a package from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut zip = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(zip.len());

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents)?;
            parts.push((entry.name().to_string(), contents));
        }

        Ok(Self { parts })
    }

    /// Contents of a part
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, contents)| contents.as_slice())
    }

    /// Contents of a part decoded as UTF-8 (lossy)
    pub fn part_string(&self, name: &str) -> Option<String> {
        self.part(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// The main document part
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.part(DOCUMENT_PART)
            .ok_or_else(|| OoxmlError::MissingFile(DOCUMENT_PART.to_string()))
    }

    /// Whether the package has a part with this name
    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// Part names in package order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Replace a part in place, or append it when new
    pub fn set_part(&mut self, name: impl Into<String>, contents: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|(n, _)| *n == name) {
            Some(part) => part.1 = contents,
            None => self.parts.push((name, contents)),
        }
    }

    /// Pack into a DOCX file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_to(File::create(path)?)
    }

    /// Pack into an in-memory buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Pack into any seekable writer, every part deflated
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, contents) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }
}
