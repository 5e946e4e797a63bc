//! Placeholder tokens and the substitution engine
//!
//! A template marks each field with a fixed, brace-delimited token. The
//! engine replaces tokens in every body paragraph and every paragraph of
//! every table cell. Matching is literal and case-sensitive.
//!
//! A paragraph whose text changes is rewritten as a single run (see
//! [`Paragraph::set_text`]), which also makes tokens split across several
//! runs by the word processor match.

use std::fmt;

use declaracao_ooxml::{Document, Paragraph};
use tracing::debug;

/// The five operator-supplied fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Full name of the responsible party
    ResponsibleName,
    /// Full name of the dependent
    DependentName,
    /// School grade or class
    Grade,
    /// Declaration date, `DD/MM/AAAA`
    Date,
    /// Period of attendance (morning, afternoon, ...)
    Period,
}

impl Field {
    /// All fields, in form order
    pub const ALL: [Field; 5] = [
        Field::ResponsibleName,
        Field::DependentName,
        Field::Grade,
        Field::Date,
        Field::Period,
    ];

    /// The literal token standing for this field in a template
    pub fn token(self) -> &'static str {
        match self {
            Field::ResponsibleName => "{{NOME_RESPONSAVEL}}",
            Field::DependentName => "{{NOME_FILHO}}",
            Field::Grade => "{{SERIE}}",
            Field::Date => "{{DATA}}",
            Field::Period => "{{PERIODO}}",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Field::ResponsibleName => "responsible party's full name",
            Field::DependentName => "dependent's full name",
            Field::Grade => "grade",
            Field::Date => "date (DD/MM/AAAA)",
            Field::Period => "period",
        }
    }

    /// What the field means inside the template
    pub fn description(self) -> &'static str {
        match self {
            Field::ResponsibleName => "Full name of the responsible party.",
            Field::DependentName => "Full name of the dependent.",
            Field::Grade => "School grade/year of the dependent.",
            Field::Date => "Date of the declaration (written out in long form).",
            Field::Period => "Period the student was present (e.g. manhã, tarde, integral).",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered token to value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `token` to the textual form of `value`
    ///
    /// A token inserted twice keeps its first position and takes the
    /// latest value.
    pub fn insert(&mut self, token: impl Into<String>, value: impl ToString) {
        let token = token.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(t, _)| *t == token) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((token, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, token: impl Into<String>, value: impl ToString) -> Self {
        self.insert(token, value);
        self
    }

    /// Look up the value for a token
    pub fn get(&self, token: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply every replacement, in insertion order, to `text`
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .filter(|(token, _)| !token.is_empty())
            .fold(text.to_string(), |acc, (token, value)| {
                acc.replace(token.as_str(), value)
            })
    }
}

/// Outcome of a substitution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionStats {
    /// Paragraphs inspected (body and table cells)
    pub paragraphs_seen: usize,
    /// Paragraphs whose text changed and was rewritten
    pub paragraphs_changed: usize,
}

/// Replace every token in the body paragraphs and table cell paragraphs
pub fn apply_replacements(document: &mut Document, replacements: &Replacements) -> SubstitutionStats {
    let mut stats = SubstitutionStats::default();

    for mut paragraph in document.paragraphs_mut() {
        substitute(&mut paragraph, replacements, &mut stats);
    }

    for mut table in document.tables_mut() {
        for mut row in table.rows() {
            for mut cell in row.cells() {
                for mut paragraph in cell.paragraphs() {
                    substitute(&mut paragraph, replacements, &mut stats);
                }
            }
        }
    }

    debug!(
        seen = stats.paragraphs_seen,
        changed = stats.paragraphs_changed,
        "Placeholder substitution finished"
    );
    stats
}

fn substitute(paragraph: &mut Paragraph<'_>, replacements: &Replacements, stats: &mut SubstitutionStats) {
    stats.paragraphs_seen += 1;
    let original = paragraph.text();
    let modified = replacements.apply(&original);
    if modified != original {
        paragraph.set_text(&modified);
        stats.paragraphs_changed += 1;
    }
}

/// Fields whose token does not occur anywhere in the document
pub fn missing_tokens(document: &Document) -> Vec<Field> {
    let text = document.plain_text();
    Field::ALL
        .into_iter()
        .filter(|field| !text.contains(field.token()))
        .collect()
}

/// Operator instructions describing the tokens a template must contain
pub fn placeholder_guide() -> String {
    let mut guide = String::from(
        "The selected .docx file must be a template containing the following \
         placeholders, which will be replaced:\n",
    );
    for field in Field::ALL {
        guide.push_str(&format!("- {}: {}\n", field.token(), field.description()));
    }
    guide.push_str(
        "\nExample: Prezada {{NOME_RESPONSAVEL}}, declaramos que {{NOME_FILHO}} \
         esteve presente no período da {{PERIODO}}...\n\n\
         Make sure the .docx file is not protected or corrupted.\n",
    );
    guide
}

#[cfg(test)]
mod tests {
    use super::*;
    use declaracao_ooxml::test_utils::{create_template_with_body, paragraph, table_row};
    use declaracao_ooxml::Template;

    fn document(body: &str) -> Document {
        let bytes = create_template_with_body(body);
        Template::from_bytes(&bytes).unwrap().document().clone()
    }

    #[test]
    fn test_tokens_are_unique_and_non_overlapping() {
        for a in Field::ALL {
            for b in Field::ALL {
                if a != b {
                    assert!(!a.token().contains(b.token()), "{:?} contains {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_replacements_apply_literal() {
        let replacements = Replacements::new()
            .with("{{A}}", "x")
            .with("[.*]", "regex-free");
        assert_eq!(replacements.apply("{{A}} and {{A}} [.*]"), "x and x regex-free");
        // Case-sensitive
        assert_eq!(replacements.apply("{{a}}"), "{{a}}");
    }

    #[test]
    fn test_replacements_convert_values_to_text() {
        let replacements = Replacements::new().with("{{N}}", 42).with("{{F}}", 1.5);
        assert_eq!(replacements.get("{{N}}"), Some("42"));
        assert_eq!(replacements.apply("{{N}}/{{F}}"), "42/1.5");
    }

    #[test]
    fn test_replacements_insert_overwrites() {
        let mut replacements = Replacements::new();
        replacements.insert("{{A}}", "first");
        replacements.insert("{{A}}", "second");
        assert_eq!(replacements.len(), 1);
        assert_eq!(replacements.get("{{A}}"), Some("second"));
    }

    #[test]
    fn test_apply_to_body_and_tables() {
        let body = format!(
            "{}{}",
            paragraph("Declaro que {{NOME_FILHO}} esteve presente."),
            table_row(&["Série: {{SERIE}}", "sem marcador"])
        );
        let mut doc = document(&body);
        let replacements = Replacements::new()
            .with(Field::DependentName.token(), "Ana")
            .with(Field::Grade.token(), "5º ano");

        let stats = apply_replacements(&mut doc, &replacements);

        assert_eq!(stats.paragraphs_seen, 3);
        assert_eq!(stats.paragraphs_changed, 2);
        assert_eq!(
            doc.plain_text(),
            "Declaro que Ana esteve presente.\nSérie: 5º ano\nsem marcador"
        );
    }

    #[test]
    fn test_token_split_across_runs() {
        let body = r#"<w:p><w:r><w:t>Olá {{NOME_</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>RESPONSAVEL}}!</w:t></w:r></w:p>"#;
        let mut doc = document(body);
        let replacements = Replacements::new().with(Field::ResponsibleName.token(), "Maria");

        apply_replacements(&mut doc, &replacements);
        assert_eq!(doc.paragraph_texts(), vec!["Olá Maria!"]);
    }

    #[test]
    fn test_absent_tokens_leave_document_untouched() {
        let mut doc = document(&paragraph("Nothing to see"));
        let before = doc.clone();
        let replacements = Replacements::new().with(Field::Date.token(), "hoje");

        let stats = apply_replacements(&mut doc, &replacements);
        assert_eq!(stats.paragraphs_changed, 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let mut doc = document(&paragraph("{{PERIODO}} / {{DATA}}"));
        let replacements = Replacements::new()
            .with(Field::Period.token(), "manhã")
            .with(Field::Date.token(), "5 de março de 2024");

        apply_replacements(&mut doc, &replacements);
        let once = doc.clone();
        let stats = apply_replacements(&mut doc, &replacements);

        assert_eq!(stats.paragraphs_changed, 0);
        assert_eq!(doc, once);
    }

    #[test]
    fn test_missing_tokens() {
        let doc = document(&format!(
            "{}{}",
            paragraph("{{NOME_RESPONSAVEL}} {{NOME_FILHO}}"),
            table_row(&["{{DATA}}"])
        ));
        assert_eq!(missing_tokens(&doc), vec![Field::Grade, Field::Period]);
    }

    #[test]
    fn test_placeholder_guide_lists_every_token() {
        let guide = placeholder_guide();
        for field in Field::ALL {
            assert!(guide.contains(field.token()));
        }
    }
}
