//! Integration tests for declaracao CLI
//!
//! These tests drive the command functions against a temporary
//! application directory: import -> status -> generate.

use std::fs;
use std::path::Path;

use declaracao_cli::{generate_command, import_command, reload_command, status_command, GenerateArgs};
use declaracao_core::{Field, ImportOutcome, ReloadOutcome, Session};
use declaracao_ooxml::test_utils::{create_template_with_body, paragraph};
use declaracao_ooxml::Template;
use declaracao_pdf::{PdfConverter, PdfError};
use tempfile::TempDir;

/// Writes a stub PDF holding the draft's text
struct TextPdf;

impl PdfConverter for TextPdf {
    fn convert(&self, input: &Path, output: &Path) -> declaracao_pdf::Result<()> {
        let draft = Template::load(input).map_err(|_| PdfError::InvalidInput(input.to_path_buf()))?;
        fs::write(output, format!("%PDF-1.4\n{}", draft.document().plain_text()))?;
        Ok(())
    }
}

fn write_template(dir: &Path) -> std::path::PathBuf {
    let body: String = [
        "Declaramos que {{NOME_FILHO}}, filho(a) de {{NOME_RESPONSAVEL}},",
        "aluno(a) do {{SERIE}}, esteve presente no período da {{PERIODO}}.",
        "{{DATA}}",
    ]
    .iter()
    .map(|line| paragraph(line))
    .collect();
    let path = dir.join("modelo.docx");
    fs::write(&path, create_template_with_body(&body)).unwrap();
    path
}

fn args(output: &Path) -> GenerateArgs {
    GenerateArgs {
        responsavel: "Maria Silva".to_string(),
        filho: "Ana Souza".to_string(),
        serie: "3º ano".to_string(),
        data: Some("15/12/2023".to_string()),
        periodo: "tarde".to_string(),
        output: Some(output.to_path_buf()),
        no_reveal: true,
    }
}

#[test]
fn test_import_cancelled() {
    let base = TempDir::new().unwrap();
    let report = import_command(base.path(), None).unwrap();
    assert!(matches!(report.outcome, ImportOutcome::Cancelled));
    assert!(matches!(report.reload, ReloadOutcome::Absent));
}

#[test]
fn test_import_missing_file_fails() {
    let base = TempDir::new().unwrap();
    let err = import_command(base.path(), Some(&base.path().join("nope.docx"))).unwrap_err();
    assert!(err.to_string().contains("File not found"));
}

#[test]
fn test_status_and_reload_before_import() {
    let base = TempDir::new().unwrap();
    assert!(matches!(status_command(base.path()).unwrap(), ReloadOutcome::Absent));
    assert!(matches!(reload_command(base.path()).unwrap(), ReloadOutcome::Absent));
}

#[test]
fn test_reload_reports_corrupt_asset() {
    let base = TempDir::new().unwrap();
    let asset_dir = base.path().join("._modelo_data");
    fs::create_dir_all(&asset_dir).unwrap();
    fs::write(asset_dir.join("declaracao_base_bytes.toml"), "version = 1\n").unwrap();

    assert!(reload_command(base.path()).is_err());
    // Status still answers, describing the failure
    assert!(matches!(
        status_command(base.path()).unwrap(),
        ReloadOutcome::Failed(_)
    ));
}

#[test]
fn test_import_then_generate() {
    let base = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let source = write_template(work.path());

    let report = import_command(base.path(), Some(&source)).unwrap();
    assert!(report.outcome.is_success());
    assert!(matches!(
        status_command(base.path()).unwrap(),
        ReloadOutcome::Loaded { .. }
    ));

    let mut session = Session::open(base.path()).unwrap();
    let out = work.path().join("declaracoes");
    let report = generate_command(&mut session, &args(&out), &TextPdf, None).unwrap();

    assert_eq!(report.pdf_path, out.join("Declaracao_Ana_Souza_15_12_2023.pdf"));
    let pdf = fs::read_to_string(&report.pdf_path).unwrap();
    assert!(pdf.starts_with("%PDF-1.4"));
    assert!(pdf.contains("Declaramos que Ana Souza, filho(a) de Maria Silva,"));
    assert!(pdf.contains("15 de dezembro de 2023"));
    for field in Field::ALL {
        assert!(!pdf.contains(field.token()));
    }
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[test]
fn test_generate_without_template() {
    let base = TempDir::new().unwrap();
    let out = base.path().join("out");
    let mut session = Session::open(base.path()).unwrap();

    let err = generate_command(&mut session, &args(&out), &TextPdf, None).unwrap_err();
    assert!(err.to_string().contains("No template data loaded"));
    assert!(!out.exists());
}

#[test]
fn test_generate_with_empty_field() {
    let base = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    import_command(base.path(), Some(&write_template(work.path()))).unwrap();

    let mut session = Session::open(base.path()).unwrap();
    let out = work.path().join("out");
    let mut args = args(&out);
    args.filho.clear();

    let err = generate_command(&mut session, &args, &TextPdf, None).unwrap_err();
    assert!(err.to_string().starts_with("All fields are required"));
    assert!(!out.exists());
}
