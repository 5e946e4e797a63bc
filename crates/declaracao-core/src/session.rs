//! Application session
//!
//! Owns the settings, the asset store and the loaded template for one
//! running front end. The template slot is filled silently at startup and
//! refreshed after every import and on explicit reload.

use std::path::{Path, PathBuf};

use declaracao_pdf::PdfConverter;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{Result, StoreError};
use crate::generator::{FieldValues, GenerationReport, Generator, Progress};
use crate::importer::{ImportOutcome, Importer};
use crate::reveal::Revealer;
use crate::store::{AssetStore, StoredTemplate, TemplateSlot};

/// Result of reading the asset back into the slot
#[derive(Debug)]
pub enum ReloadOutcome {
    /// A template is now loaded
    Loaded {
        /// File the template was imported from
        source: Option<String>,
        /// Payload size in bytes
        size: usize,
    },
    /// No asset has been imported yet
    Absent,
    /// The asset exists but could not be used
    Failed(StoreError),
}

impl ReloadOutcome {
    /// Status line for the operator
    pub fn status(&self) -> String {
        match self {
            ReloadOutcome::Loaded { source, size } => match source {
                Some(name) => format!("Template '{}' loaded ({} bytes).", name, size),
                None => format!("Template loaded ({} bytes).", size),
            },
            ReloadOutcome::Absent => {
                "No template configured. Use the import command to select one.".to_string()
            }
            ReloadOutcome::Failed(err) => format!("Template could not be loaded: {}", err),
        }
    }
}

/// Importer outcome followed by the reload that always comes after it
#[derive(Debug)]
pub struct ImportReport {
    /// What the importer did
    pub outcome: ImportOutcome,
    /// State of the slot afterwards
    pub reload: ReloadOutcome,
}

/// Settings, store and loaded template of one running application
#[derive(Debug)]
pub struct Session {
    base_dir: PathBuf,
    settings: Settings,
    store: AssetStore,
    slot: TemplateSlot,
}

impl Session {
    /// Open a session rooted at `base_dir` and load any stored template
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let settings = Settings::load(&base_dir)?;
        Ok(Self::with_settings(base_dir, settings))
    }

    /// Open a session with explicit settings
    pub fn with_settings(base_dir: impl Into<PathBuf>, settings: Settings) -> Self {
        let base_dir = base_dir.into();
        let store = settings.asset_store(&base_dir);
        let mut session = Self {
            base_dir,
            settings,
            store,
            slot: TemplateSlot::new(),
        };

        // Startup load is silent; failures only show up in the log
        match session.reload() {
            ReloadOutcome::Failed(err) => warn!(error = %err, "Stored template unusable"),
            outcome => debug!(?outcome, "Startup template load"),
        }
        session
    }

    /// Application base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The asset store
    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Currently loaded template
    pub fn template(&self) -> Option<&StoredTemplate> {
        self.slot.get()
    }

    /// Output folder for generated declarations
    pub fn output_dir(&self) -> PathBuf {
        self.settings.output_dir()
    }

    /// Write declarations into `dir` instead of the configured folder
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.settings.output.dir = dir.into();
    }

    /// Re-read the asset from disk into the slot
    ///
    /// Any failure leaves the slot empty.
    pub fn reload(&mut self) -> ReloadOutcome {
        match self.store.load() {
            Ok(Some(template)) => {
                let outcome = ReloadOutcome::Loaded {
                    source: template.source.clone(),
                    size: template.bytes.len(),
                };
                self.slot.set(Some(template));
                info!("Template loaded into memory");
                outcome
            }
            Ok(None) => {
                self.slot.set(None);
                ReloadOutcome::Absent
            }
            Err(err) => {
                self.slot.set(None);
                ReloadOutcome::Failed(err)
            }
        }
    }

    /// Run the importer for `picked`, then reload
    pub fn import(&mut self, picked: Option<&Path>) -> ImportReport {
        let outcome = Importer::new(&self.store).run(picked);
        let reload = self.reload();
        ImportReport { outcome, reload }
    }

    /// Generate a declaration from the loaded template
    pub fn generate(
        &self,
        fields: &FieldValues,
        converter: &dyn PdfConverter,
        revealer: Option<&dyn Revealer>,
        progress: &mut dyn Progress,
    ) -> Result<GenerationReport> {
        let mut generator = Generator::new(self.output_dir(), converter);
        if let Some(revealer) = revealer {
            generator = generator.with_revealer(revealer);
        }
        generator.generate(self.slot.bytes(), fields, progress)
    }
}
