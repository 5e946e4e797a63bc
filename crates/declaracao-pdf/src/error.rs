//! Error types for PDF conversion

use std::path::PathBuf;

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur during PDF conversion
#[derive(Error, Debug)]
pub enum PdfError {
    /// The converter program could not be started
    #[error("Failed to start converter '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran but reported failure
    #[error("Conversion failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    /// The converter exited cleanly without producing the PDF
    #[error("PDF not generated at {}", .0.display())]
    MissingOutput(PathBuf),

    /// Input document does not exist or has no usable file name
    #[error("Invalid input document: {}", .0.display())]
    InvalidInput(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
