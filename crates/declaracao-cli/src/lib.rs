//! declaracao CLI - Command-line interface library
//!
//! The command-line front end for declaracao:
//! - Import: store a `.docx` template beside the application
//! - Generate: fill the template and export the declaration as PDF
//! - Reload / Status: inspect the stored template
//! - Placeholders: list the tokens a template must contain
//!
//! # Binary Usage
//!
//! ```bash
//! # Store the template
//! declaracao import modelo.docx
//!
//! # Generate a declaration (the date defaults to today)
//! declaracao generate --responsavel "Maria Silva" --filho "Ana Silva" \
//!     --serie "5º ano" --data 05/03/2024 --periodo manhã
//! ```

pub mod app;

pub use app::{
    generate_command, import_command, reload_command, run_cli, status_command, GenerateArgs,
};
