//! Application settings
//!
//! Read from `declaracao.toml` in the application base directory. Every
//! section and key is optional:
//!
//! ```toml
//! [storage]
//! asset_dir = "._modelo_data"
//! asset_file = "declaracao_base_bytes.toml"
//!
//! [output]
//! dir = "declaracoes_geradas"
//! reveal = true
//!
//! [converter]
//! program = "soffice"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeclarationError, Result};
use crate::store::{AssetStore, ASSET_DIR_NAME, ASSET_FILE_NAME};

/// Settings file name, looked up in the base directory
pub const CONFIG_FILE_NAME: &str = "declaracao.toml";

/// Default output folder
pub const OUTPUT_DIR_NAME: &str = "declaracoes_geradas";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Where the template asset lives
    pub storage: StorageSettings,
    /// Where declarations are written
    pub output: OutputSettings,
    /// External PDF converter
    pub converter: ConverterSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load `declaracao.toml` from `base_dir`, or defaults when absent
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| DeclarationError::Io {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml_str(&text).map_err(|e| DeclarationError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Asset store rooted at `base_dir`
    pub fn asset_store(&self, base_dir: &Path) -> AssetStore {
        AssetStore::with_names(
            base_dir,
            &self.storage.asset_dir,
            self.storage.asset_file.clone(),
        )
    }

    /// Output directory; relative paths resolve against the working directory
    pub fn output_dir(&self) -> PathBuf {
        self.output.dir.clone()
    }
}

/// Template asset location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Hidden directory under the base directory
    pub asset_dir: String,
    /// Asset file name inside `asset_dir`
    pub asset_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            asset_dir: ASSET_DIR_NAME.to_string(),
            asset_file: ASSET_FILE_NAME.to_string(),
        }
    }
}

/// Output folder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Folder receiving drafts and PDFs
    pub dir: PathBuf,
    /// Open the folder after a successful generation
    pub reveal: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(OUTPUT_DIR_NAME),
            reveal: true,
        }
    }
}

/// PDF converter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Office suite executable
    pub program: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            program: declaracao_pdf::DEFAULT_PROGRAM.to_string(),
        }
    }
}
