//! Shared test utilities for declaracao-ooxml
//!
//! Builds small but valid DOCX packages in memory, so tests across the
//! workspace don't need binary fixtures on disk.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::archive::{OoxmlArchive, DOCUMENT_PART};

const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const PACKAGE_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
</Relationships>"#;

/// Create a minimal valid DOCX with a single "Template" paragraph
pub fn create_minimal_template() -> Vec<u8> {
    create_template_with_body("<w:p><w:r><w:t>Template</w:t></w:r></w:p>")
}

/// Create a valid DOCX whose `w:body` holds the given WordprocessingML
///
/// The `w` prefix is bound to the main namespace.
pub fn create_template_with_body(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>{}<w:sectPr/></w:body>
</w:document>"#,
        body
    );

    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(CONTENT_TYPES).unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(PACKAGE_RELS).unwrap();

    zip.start_file("word/_rels/document.xml.rels", options)
        .unwrap();
    zip.write_all(DOCUMENT_RELS).unwrap();

    zip.start_file(DOCUMENT_PART, options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer.into_inner()
}

/// Wrap plain text in a single-run paragraph
pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// A one-row table whose cells each hold one paragraph of text
pub fn table_row(cells: &[&str]) -> String {
    let cells: String = cells
        .iter()
        .map(|text| format!("<w:tc>{}</w:tc>", paragraph(text)))
        .collect();
    format!("<w:tbl><w:tblPr/><w:tr>{}</w:tr></w:tbl>", cells)
}

/// Extract document.xml content from a DOCX byte array
pub fn extract_document_xml(docx: &[u8]) -> String {
    let archive = OoxmlArchive::from_bytes(docx).unwrap();
    archive.part_string(DOCUMENT_PART).unwrap()
}
