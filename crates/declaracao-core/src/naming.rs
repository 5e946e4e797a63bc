//! Output file naming
//!
//! File names embed the dependent's name and the date, each reduced to
//! ASCII letters and digits with every other character replaced by `_`.

use std::path::{Path, PathBuf};

/// Prefix of the transient filled document
pub const DRAFT_PREFIX: &str = "temp_declaracao_";

/// Prefix of the final PDF
pub const PDF_PREFIX: &str = "Declaracao_";

/// Replace every character that is not an ASCII letter or digit with `_`
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Sanitize a `DD/MM/AAAA` date for use in a file name
pub fn sanitize_date(date: &str) -> String {
    sanitize_component(&date.replace('/', "-"))
}

/// The draft document and final PDF paths for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `temp_declaracao_<name>_<date>.docx`, removed after conversion
    pub draft: PathBuf,
    /// `Declaracao_<name>_<date>.pdf`
    pub pdf: PathBuf,
}

impl OutputPaths {
    /// Derive both paths inside `output_dir`
    pub fn new(output_dir: &Path, dependent_name: &str, date: &str) -> Self {
        let stem = format!(
            "{}_{}",
            sanitize_component(dependent_name),
            sanitize_date(date)
        );
        Self {
            draft: output_dir.join(format!("{}{}.docx", DRAFT_PREFIX, stem)),
            pdf: output_dir.join(format!("{}{}.pdf", PDF_PREFIX, stem)),
        }
    }
}
