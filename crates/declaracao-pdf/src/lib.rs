//! declaracao-pdf - DOCX to PDF conversion
//!
//! The conversion itself is delegated to an external office suite. The
//! [`PdfConverter`] trait is the seam: generation code only ever asks for
//! "this document, as a PDF at that path", and tests substitute a fake.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use declaracao_pdf::{OfficeConverter, PdfConverter};
//!
//! let converter = OfficeConverter::default();
//! converter.convert(Path::new("filled.docx"), Path::new("filled.pdf"))?;
//! # Ok::<(), declaracao_pdf::PdfError>(())
//! ```

mod converter;
mod error;

pub use converter::{OfficeConverter, PdfConverter, DEFAULT_PROGRAM};
pub use error::{PdfError, Result};
