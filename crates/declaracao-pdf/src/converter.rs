//! Document to PDF conversion through a headless office suite

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{PdfError, Result};

/// Program used when none is configured
pub const DEFAULT_PROGRAM: &str = "soffice";

/// Turns a word-processing document into a PDF
pub trait PdfConverter {
    /// Convert `input` and write the PDF to `output`, replacing any
    /// existing file there
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Converter backed by LibreOffice (`soffice --headless --convert-to pdf`)
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: String,
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl OfficeConverter {
    /// Use the given executable name or path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The configured executable
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl PdfConverter for OfficeConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let stem = input
            .file_stem()
            .ok_or_else(|| PdfError::InvalidInput(input.to_path_buf()))?;
        if !input.is_file() {
            return Err(PdfError::InvalidInput(input.to_path_buf()));
        }

        // soffice names the PDF after the input; convert into a scratch
        // directory and move the result to the requested name.
        let scratch = tempfile::tempdir()?;

        debug!(program = %self.program, input = %input.display(), "Invoking converter");
        let result = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(scratch.path())
            .arg(input)
            .output()
            .map_err(|source| PdfError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(PdfError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let mut produced = scratch.path().join(stem);
        produced.set_extension("pdf");
        if !produced.is_file() {
            return Err(PdfError::MissingOutput(produced));
        }

        // Copy rather than rename: the scratch dir may be on another filesystem
        fs::copy(&produced, output)?;
        info!(output = %output.display(), "PDF written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        assert_eq!(OfficeConverter::default().program(), "soffice");
        assert_eq!(OfficeConverter::new("/opt/lo/soffice").program(), "/opt/lo/soffice");
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let converter = OfficeConverter::default();
        let err = converter
            .convert(&dir.path().join("absent.docx"), &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_program_reports_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.docx");
        fs::write(&input, b"not really a docx").unwrap();

        let converter = OfficeConverter::new("declaracao-no-such-converter-binary");
        let err = converter
            .convert(&input, &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::Launch { .. }));
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.docx");
        fs::write(&input, b"x").unwrap();

        // `false` ignores its arguments and exits 1
        let err = OfficeConverter::new("false")
            .convert(&input, &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::Failed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_program_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.docx");
        fs::write(&input, b"x").unwrap();

        // `true` succeeds but writes nothing
        let err = OfficeConverter::new("true")
            .convert(&input, &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::MissingOutput(_)));
    }
}
