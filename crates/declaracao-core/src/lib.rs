//! # declaracao-core
//!
//! Fills a `.docx` declaration template with five operator-supplied
//! fields and exports the result as PDF.
//!
//! The template is imported once; its bytes are kept in a small data file
//! beside the application so later generations do not depend on the
//! original file. Each generation substitutes the placeholder tokens,
//! writes a draft document, converts it with an external office suite and
//! removes the draft.
//!
//! ## Example
//!
//! ```no_run
//! use declaracao_core::{FieldValues, NoProgress, Session};
//! use declaracao_pdf::OfficeConverter;
//!
//! let mut session = Session::open(".")?;
//! session.import(Some(std::path::Path::new("modelo.docx")));
//!
//! let fields = FieldValues {
//!     responsible_name: "Maria Silva".into(),
//!     dependent_name: "Ana Silva".into(),
//!     grade: "5º ano".into(),
//!     date: "05/03/2024".into(),
//!     period: "manhã".into(),
//! };
//! let report = session.generate(&fields, &OfficeConverter::default(), None, &mut NoProgress)?;
//! println!("{}", report.pdf_path.display());
//! # Ok::<(), declaracao_core::DeclarationError>(())
//! ```

pub mod config;
pub mod date;
pub mod error;
pub mod generator;
pub mod importer;
pub mod naming;
pub mod placeholders;
pub mod reveal;
pub mod session;
pub mod store;

pub use config::{Settings, CONFIG_FILE_NAME, OUTPUT_DIR_NAME};
pub use date::{format_long_date, today};
pub use error::{DeclarationError, Result, StoreError};
pub use generator::{
    Checkpoint, FieldValues, GenerationReport, Generator, NoProgress, Progress,
};
pub use importer::{ImportOutcome, Importer};
pub use naming::{sanitize_component, sanitize_date, OutputPaths};
pub use placeholders::{
    apply_replacements, missing_tokens, placeholder_guide, Field, Replacements, SubstitutionStats,
};
pub use reveal::{Revealer, SystemRevealer};
pub use session::{ImportReport, ReloadOutcome, Session};
pub use store::{AssetStore, StoredTemplate, TemplateSlot, ASSET_DIR_NAME, ASSET_FILE_NAME};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }
}
