//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use declaracao_core::{
    placeholder_guide, today, Checkpoint, FieldValues, GenerationReport, ImportOutcome, ImportReport, Progress, ReloadOutcome, Revealer, Session, SystemRevealer,
};
use declaracao_pdf::{OfficeConverter, PdfConverter};

#[derive(Parser)]
#[command(name = "declaracao")]
#[command(author, version, about = "Attendance declarations from a DOCX template", long_about = None)]
struct Cli {
    /// Application directory holding the stored template and settings
    /// (defaults to the executable's directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a .docx template; without FILE the import is cancelled
    Import {
        /// Template document
        file: Option<PathBuf>,
    },

    /// Fill the template and export the declaration as PDF
    Generate(GenerateArgs),

    /// Re-read the stored template from disk
    Reload,

    /// Show whether a template is configured
    Status,

    /// List the placeholders a template must contain
    Placeholders,
}

/// Field values and options for `generate`
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Full name of the responsible party
    #[arg(long)]
    pub responsavel: String,

    /// Full name of the dependent
    #[arg(long)]
    pub filho: String,

    /// School grade
    #[arg(long)]
    pub serie: String,

    /// Date as DD/MM/AAAA (defaults to today)
    #[arg(long)]
    pub data: Option<String>,

    /// Period of attendance (manhã, tarde, integral)
    #[arg(long)]
    pub periodo: String,

    /// Output folder (overrides the settings file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not open the output folder afterwards
    #[arg(long)]
    pub no_reveal: bool,
}

impl GenerateArgs {
    /// The form values, with the date pre-filled when not given
    pub fn field_values(&self) -> FieldValues {
        FieldValues {
            responsible_name: self.responsavel.clone(),
            dependent_name: self.filho.clone(),
            grade: self.serie.clone(),
            date: self.data.clone().unwrap_or_else(today),
            period: self.periodo.clone(),
        }
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => default_base_dir()?,
    };
    debug!(base_dir = %base_dir.display(), "Using application directory");

    match cli.command {
        Commands::Import { file } => {
            import_command(&base_dir, file.as_deref())?;
        }
        Commands::Generate(args) => {
            let mut session = open_session(&base_dir)?;
            let converter = OfficeConverter::new(session.settings().converter.program.clone());
            let reveal = session.settings().output.reveal && !args.no_reveal;
            let revealer = SystemRevealer;
            generate_command(
                &mut session,
                &args,
                &converter,
                reveal.then_some(&revealer as &dyn Revealer),
            )?;
        }
        Commands::Reload => {
            reload_command(&base_dir)?;
        }
        Commands::Status => {
            status_command(&base_dir)?;
        }
        Commands::Placeholders => {
            print!("{}", placeholder_guide());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn default_base_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn open_session(base_dir: &Path) -> Result<Session> {
    Session::open(base_dir)
        .with_context(|| format!("Failed to open application directory: {}", base_dir.display()))
}

/// Execute the import command
pub fn import_command(base_dir: &Path, file: Option<&Path>) -> Result<ImportReport> {
    let mut session = open_session(base_dir)?;
    if file.is_some() {
        println!("{}", placeholder_guide());
    }

    let report = session.import(file);
    println!("{}", report.outcome.status());

    match &report.outcome {
        ImportOutcome::Imported {
            asset_path,
            warnings,
            ..
        } => {
            println!("  Stored: {}", asset_path.display());
            for warning in warnings {
                println!("  Warning: {}", warning);
            }
            println!("{}", report.reload.status());
        }
        ImportOutcome::Failed(err) => {
            anyhow::bail!("Template import failed: {}", err);
        }
        ImportOutcome::Cancelled => {}
    }

    Ok(report)
}

/// Execute the generate command
pub fn generate_command(
    session: &mut Session,
    args: &GenerateArgs,
    converter: &dyn PdfConverter,
    revealer: Option<&dyn Revealer>,
) -> Result<GenerationReport> {
    if let Some(output) = &args.output {
        session.set_output_dir(output.clone());
    }

    let mut progress = BarProgress::new();
    let result = session.generate(&args.field_values(), converter, revealer, &mut progress);
    progress.finish();
    let report = result?;

    println!("Declaration generated: {}", report.pdf_path.display());
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    Ok(report)
}

/// Execute the reload command
pub fn reload_command(base_dir: &Path) -> Result<ReloadOutcome> {
    let mut session = open_session(base_dir)?;
    let outcome = session.reload();
    println!("{}", outcome.status());
    if let ReloadOutcome::Failed(err) = &outcome {
        anyhow::bail!("Failed to reload template: {}", err);
    }
    Ok(outcome)
}

/// Execute the status command
pub fn status_command(base_dir: &Path) -> Result<ReloadOutcome> {
    let mut session = open_session(base_dir)?;
    let outcome = session.reload();

    println!("declaracao v{}", declaracao_core::VERSION);
    println!("  Application directory: {}", session.base_dir().display());
    println!("  Template asset: {}", session.store().asset_path().display());
    println!("  {}", outcome.status());
    println!("  Output folder: {}", session.output_dir().display());
    println!("  Converter: {}", session.settings().converter.program);
    Ok(outcome)
}

/// Terminal progress bar driven by generation checkpoints
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for BarProgress {
    fn checkpoint(&mut self, checkpoint: Checkpoint) {
        self.bar.set_position(u64::from(checkpoint.percent()));
        self.bar.set_message(checkpoint.message());
    }

    fn reset(&mut self) {
        self.bar.set_position(0);
        self.bar.set_message("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "declaracao",
            "--base-dir",
            "/opt/declaracao",
            "generate",
            "--responsavel",
            "Maria Silva",
            "--filho",
            "Ana",
            "--serie",
            "5º ano",
            "--periodo",
            "manhã",
            "--no-reveal",
        ])
        .unwrap();

        assert_eq!(cli.base_dir, Some(PathBuf::from("/opt/declaracao")));
        match cli.command {
            Commands::Generate(args) => {
                assert!(args.no_reveal);
                assert_eq!(args.data, None);
                let fields = args.field_values();
                assert_eq!(fields.grade, "5º ano");
                assert_eq!(fields.date.len(), 10);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_parses_import_without_file() {
        let cli = Cli::try_parse_from(["declaracao", "import", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Import { file: None }));
    }

    #[test]
    fn test_generate_requires_fields() {
        assert!(Cli::try_parse_from(["declaracao", "generate", "--filho", "Ana"]).is_err());
    }

    #[test]
    fn test_explicit_date_kept() {
        let cli = Cli::try_parse_from([
            "declaracao",
            "generate",
            "--responsavel",
            "a",
            "--filho",
            "b",
            "--serie",
            "c",
            "--data",
            "05/03/2024",
            "--periodo",
            "d",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.field_values().date, "05/03/2024");
    }
}
