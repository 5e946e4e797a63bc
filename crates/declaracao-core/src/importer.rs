//! Template importer flow
//!
//! One invocation takes the operator's pick (or lack of one), persists the
//! file's bytes and reports the outcome. It runs to completion before the
//! caller continues; the caller reloads the template slot afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use declaracao_ooxml::Template;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::placeholders::{missing_tokens, Field};
use crate::store::AssetStore;

/// Result of one importer invocation
#[derive(Debug)]
pub enum ImportOutcome {
    /// No file was picked
    Cancelled,
    /// The file's bytes were persisted
    Imported {
        /// Asset file written
        asset_path: PathBuf,
        /// File name of the imported document
        source_name: String,
        /// Tokens the template does not contain
        missing_tokens: Vec<Field>,
        /// Non-fatal findings about the template
        warnings: Vec<String>,
    },
    /// Reading or persisting failed
    Failed(StoreError),
}

impl ImportOutcome {
    /// Status line for the operator
    pub fn status(&self) -> String {
        match self {
            ImportOutcome::Cancelled => "No file selected.".to_string(),
            ImportOutcome::Imported { source_name, .. } => {
                format!("Template '{}' imported successfully.", source_name)
            }
            ImportOutcome::Failed(err) => format!("Import failed: {}", err),
        }
    }

    /// Whether the asset was written
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }
}

/// Persists an operator-picked document through an [`AssetStore`]
#[derive(Debug, Clone, Copy)]
pub struct Importer<'a> {
    store: &'a AssetStore,
}

impl<'a> Importer<'a> {
    /// Importer writing into `store`
    pub fn new(store: &'a AssetStore) -> Self {
        Self { store }
    }

    /// Run the flow for one pick
    pub fn run(&self, picked: Option<&Path>) -> ImportOutcome {
        let Some(source) = picked else {
            info!("Import cancelled");
            return ImportOutcome::Cancelled;
        };

        let bytes = match fs::read(source) {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(StoreError::from_io(source, e)),
        };
        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());

        let asset_path = match self.store.persist(&bytes, &source_name) {
            Ok(path) => path,
            Err(err) => return self.fail(err),
        };

        let mut warnings = Vec::new();
        let missing = match Template::from_bytes(&bytes) {
            Ok(template) => missing_tokens(template.document()),
            Err(e) => {
                warnings.push(format!(
                    "'{}' could not be read as a .docx template ({}); generation will fail until a valid template is imported",
                    source_name, e
                ));
                Vec::new()
            }
        };
        if !missing.is_empty() {
            let tokens: Vec<&str> = missing.iter().map(|f| f.token()).collect();
            warnings.push(format!(
                "template does not contain: {}; those fields will not be filled",
                tokens.join(", ")
            ));
        }
        for warning in &warnings {
            warn!("{}", warning);
        }

        info!(source = %source_name, asset = %asset_path.display(), "Template imported");
        ImportOutcome::Imported {
            asset_path,
            source_name,
            missing_tokens: missing,
            warnings,
        }
    }

    fn fail(&self, err: StoreError) -> ImportOutcome {
        warn!(error = %err, "Template import failed");
        ImportOutcome::Failed(err)
    }
}
