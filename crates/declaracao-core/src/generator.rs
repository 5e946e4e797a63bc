//! Declaration generation
//!
//! Turns five field values and the loaded template bytes into a PDF:
//!
//! 1. validate the fields
//! 2. parse the template
//! 3. substitute the placeholders
//! 4. save a draft `.docx` in the output folder
//! 5. convert the draft to PDF and remove it
//! 6. reveal the output folder
//!
//! Progress is reported at fixed checkpoints. Any failure resets the
//! indicator and ends the attempt; the loaded template is never modified.

use std::fs;
use std::path::PathBuf;

use declaracao_ooxml::Template;
use declaracao_pdf::PdfConverter;
use tracing::{debug, info, warn};

use crate::date::format_long_date;
use crate::error::{DeclarationError, Result};
use crate::naming::OutputPaths;
use crate::placeholders::{apply_replacements, Field, Replacements};
use crate::reveal::Revealer;

/// The operator's input for one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    /// Full name of the responsible party
    pub responsible_name: String,
    /// Full name of the dependent
    pub dependent_name: String,
    /// School grade
    pub grade: String,
    /// Date as `DD/MM/AAAA`
    pub date: String,
    /// Period of attendance
    pub period: String,
}

impl FieldValues {
    /// Raw value for a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ResponsibleName => &self.responsible_name,
            Field::DependentName => &self.dependent_name,
            Field::Grade => &self.grade,
            Field::Date => &self.date,
            Field::Period => &self.period,
        }
    }

    /// Fields left empty, in form order
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// Token mapping for these values; the date is written out in long form
    pub fn replacements(&self) -> Replacements {
        let mut replacements = Replacements::new();
        for field in Field::ALL {
            let value = match field {
                Field::Date => format_long_date(&self.date),
                _ => self.get(field).to_string(),
            };
            replacements.insert(field.token(), value);
        }
        replacements
    }
}

/// Progress checkpoints of a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Checkpoint {
    /// Attempt started
    Started,
    /// Template parsed
    TemplateLoaded,
    /// Placeholders substituted
    FieldsFilled,
    /// Draft document saved
    DraftSaved,
    /// PDF produced
    PdfProduced,
    /// Draft removed
    Finished,
}

impl Checkpoint {
    /// Completion percentage
    pub fn percent(self) -> u8 {
        match self {
            Checkpoint::Started => 0,
            Checkpoint::TemplateLoaded => 10,
            Checkpoint::FieldsFilled => 40,
            Checkpoint::DraftSaved => 60,
            Checkpoint::PdfProduced => 90,
            Checkpoint::Finished => 100,
        }
    }

    /// Short description of the step just completed
    pub fn message(self) -> &'static str {
        match self {
            Checkpoint::Started => "Starting",
            Checkpoint::TemplateLoaded => "Template loaded",
            Checkpoint::FieldsFilled => "Fields filled",
            Checkpoint::DraftSaved => "Draft saved",
            Checkpoint::PdfProduced => "PDF produced",
            Checkpoint::Finished => "Done",
        }
    }
}

/// Receives progress updates
pub trait Progress {
    /// A checkpoint was reached
    fn checkpoint(&mut self, checkpoint: Checkpoint);

    /// The attempt failed; return the indicator to its initial state
    fn reset(&mut self);
}

/// Discards progress updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn checkpoint(&mut self, _checkpoint: Checkpoint) {}
    fn reset(&mut self) {}
}

/// A finished generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// The PDF written
    pub pdf_path: PathBuf,
    /// Folder containing it
    pub output_dir: PathBuf,
    /// Non-fatal problems (the folder could not be revealed)
    pub warnings: Vec<String>,
}

/// Runs generations into one output folder
pub struct Generator<'a> {
    output_dir: PathBuf,
    converter: &'a dyn PdfConverter,
    revealer: Option<&'a dyn Revealer>,
}

impl<'a> Generator<'a> {
    /// Generator writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, converter: &'a dyn PdfConverter) -> Self {
        Self {
            output_dir: output_dir.into(),
            converter,
            revealer: None,
        }
    }

    /// Open the output folder after each successful generation
    pub fn with_revealer(mut self, revealer: &'a dyn Revealer) -> Self {
        self.revealer = Some(revealer);
        self
    }

    /// Generate one declaration from the loaded template bytes
    ///
    /// Empty fields are rejected before any progress is reported.
    pub fn generate(
        &self,
        template: Option<&[u8]>,
        fields: &FieldValues,
        progress: &mut dyn Progress,
    ) -> Result<GenerationReport> {
        let missing = fields.missing();
        if !missing.is_empty() {
            debug!(?missing, "Rejecting generation with empty fields");
            return Err(DeclarationError::Validation { missing });
        }

        match self.run(template, fields, progress) {
            Ok(report) => Ok(report),
            Err(err) => {
                progress.reset();
                warn!(error = %err, "Generation failed");
                Err(err)
            }
        }
    }

    fn run(
        &self,
        template: Option<&[u8]>,
        fields: &FieldValues,
        progress: &mut dyn Progress,
    ) -> Result<GenerationReport> {
        progress.checkpoint(Checkpoint::Started);

        let bytes = template.ok_or(DeclarationError::TemplateNotConfigured)?;
        let mut template = Template::from_bytes(bytes).map_err(DeclarationError::TemplateCorrupt)?;
        progress.checkpoint(Checkpoint::TemplateLoaded);

        let stats = apply_replacements(template.document_mut(), &fields.replacements());
        debug!(changed = stats.paragraphs_changed, "Fields substituted");
        progress.checkpoint(Checkpoint::FieldsFilled);

        fs::create_dir_all(&self.output_dir).map_err(|source| DeclarationError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let paths = OutputPaths::new(&self.output_dir, &fields.dependent_name, &fields.date);

        template
            .save(&paths.draft)
            .map_err(|source| DeclarationError::Save {
                path: paths.draft.clone(),
                source,
            })?;
        progress.checkpoint(Checkpoint::DraftSaved);

        // On failure the draft stays in the output folder
        self.converter.convert(&paths.draft, &paths.pdf)?;
        progress.checkpoint(Checkpoint::PdfProduced);

        fs::remove_file(&paths.draft).map_err(|source| DeclarationError::Io {
            path: paths.draft.clone(),
            source,
        })?;
        progress.checkpoint(Checkpoint::Finished);
        info!(pdf = %paths.pdf.display(), "Declaration generated");

        let mut warnings = Vec::new();
        if let Some(revealer) = self.revealer {
            if let Err(e) = revealer.reveal(&self.output_dir) {
                warn!(error = %e, "Could not open the output folder");
                warnings.push(format!(
                    "Could not open the folder {}: {}",
                    self.output_dir.display(),
                    e
                ));
            }
        }

        Ok(GenerationReport {
            pdf_path: paths.pdf,
            output_dir: self.output_dir.clone(),
            warnings,
        })
    }
}
