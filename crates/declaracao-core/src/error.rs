//! Error types for declaration generation and template storage

use std::path::PathBuf;

use declaracao_ooxml::OoxmlError;
use declaracao_pdf::PdfError;
use thiserror::Error;

use crate::placeholders::Field;

/// Result type for declaration operations
pub type Result<T> = std::result::Result<T, DeclarationError>;

/// Failures of the byte-asset store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The selected source document vanished before it could be read
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The asset directory or the source file is not accessible
    #[error("Permission denied: {}. Check the write permissions of the directory.", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The asset file exists but cannot be decoded
    #[error("Template asset is malformed: {0}")]
    Malformed(String),

    /// The asset file decodes but carries no payload
    #[error("Template asset has no payload field")]
    MissingPayload,

    /// Any other IO failure
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Classify an IO error raised while touching `path`
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path },
            _ => StoreError::Io { path, source },
        }
    }
}

/// Errors surfaced to the operator by a generation attempt
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// One or more required fields are empty
    #[error("All fields are required (missing: {})", join_labels(.missing))]
    Validation { missing: Vec<Field> },

    /// No template payload is loaded
    #[error("No template data loaded. Use the import command to select the .docx template first.")]
    TemplateNotConfigured,

    /// The loaded payload is not a readable DOCX
    #[error("Template data is corrupt or unreadable: {0}. Import the template again.")]
    TemplateCorrupt(#[source] OoxmlError),

    /// The filled document could not be serialized
    #[error("Failed to save the filled document to {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: OoxmlError,
    },

    /// Filesystem failure in the output directory
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external converter failed
    #[error("PDF conversion failed: {0}")]
    Conversion(#[from] PdfError),

    /// Template storage failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Settings file could not be read or parsed
    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

fn join_labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = DeclarationError::Validation {
            missing: vec![Field::DependentName, Field::Period],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("All fields are required"));
        assert!(msg.contains(Field::DependentName.label()));
        assert!(msg.contains(Field::Period.label()));
    }

    #[test]
    fn test_io_classification() {
        let not_found = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            StoreError::from_io("a.docx", not_found),
            StoreError::NotFound { .. }
        ));

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            StoreError::from_io("dir", denied),
            StoreError::PermissionDenied { .. }
        ));

        let other = std::io::Error::other("disk on fire");
        assert!(matches!(
            StoreError::from_io("x", other),
            StoreError::Io { .. }
        ));
    }

    #[test]
    fn test_not_configured_mentions_import() {
        let msg = DeclarationError::TemplateNotConfigured.to_string();
        assert!(msg.contains("import"));
    }
}
