//! # declaracao-ooxml
//!
//! DOCX container handling for declaracao.
//!
//! This crate provides functionality to:
//! - Unpack and re-pack DOCX archives in memory
//! - Parse `word/document.xml` into an editable element tree
//! - Walk body paragraphs and table cells and rewrite their text
//!
//! ## Example: Reading a Document
//!
//! ```no_run
//! use declaracao_ooxml::{Document, OoxmlArchive};
//!
//! let archive = OoxmlArchive::open("document.docx")?;
//! let document = Document::parse(archive.document_xml()?)?;
//!
//! for text in document.paragraph_texts() {
//!     println!("{}", text);
//! }
//! # Ok::<(), declaracao_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod template;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::{OoxmlArchive, DOCUMENT_PART};
pub use document::{Document, Element, Node, Paragraph, Table, TableCell, TableRow};
pub use error::{OoxmlError, Result};
pub use template::Template;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
