//! Prompt templates and the named-placeholder format strings they are built from.
//!
//! Format strings follow the `str.format` conventions the template files are authored
//! in: `{name}` is a placeholder, `{{` and `}}` are literal braces. Positional fields,
//! conversions and format specs are rejected.

use crate::error::{DatasetError, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("field pattern compiles")
});

const INPUT_FORMAT: &str = "dialogue_template.input_format";
const OUTPUT_FORMAT: &str = "dialogue_template.output_format";
const HISTORY_STUDENT: &str = "history_format.student";
const HISTORY_TUTOR: &str = "history_format.tutor";

pub const HISTORY: &str = "history";
pub const STUDENT_MESSAGE: &str = "student_message";
pub const TUTOR_MESSAGE: &str = "tutor_message";
pub const MESSAGE: &str = "message";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatString {
    segments: Vec<Segment>,
}

impl FormatString {
    /// Parse `source`; `slot` names the template in error messages.
    pub fn parse(slot: &str, source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for cap in FIELD_RE.captures_iter(source) {
            let Some(whole) = cap.get(0) else { continue };
            literal.push_str(&source[last..whole.start()]);
            last = whole.end();

            match whole.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{" | "}" => {
                    return Err(DatasetError::TemplateSyntax {
                        slot: slot.to_string(),
                        message: format!(
                            "single '{}' at byte {} (use '{{{{' or '}}}}' for a literal brace)",
                            whole.as_str(),
                            whole.start()
                        ),
                    });
                }
                field => {
                    let name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
                    if !is_identifier(name) {
                        return Err(DatasetError::TemplateSyntax {
                            slot: slot.to_string(),
                            message: format!("unsupported replacement field '{}'", field),
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
            }
        }

        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Placeholder names in the order they appear.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute `args` into the template. Values are inserted verbatim.
    pub fn render(&self, args: &[(&str, &str)]) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = args
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| DatasetError::MissingArgument { name: name.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    fn check_placeholders(&self, slot: &str, allowed: &[&str]) -> Result<()> {
        if let Some(name) = self.placeholders().find(|name| !allowed.contains(name)) {
            return Err(DatasetError::UnknownPlaceholder {
                slot: slot.to_string(),
                name: name.to_string(),
            });
        }
        for expected in allowed {
            if !self.placeholders().any(|name| name == *expected) {
                tracing::warn!(slot, placeholder = *expected, "template never uses placeholder");
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// =============================================================================
// Template file
// =============================================================================

#[derive(Deserialize)]
struct RawDialogueTemplate {
    input_format: String,
    output_format: String,
}

#[derive(Deserialize)]
struct RawHistoryFormat {
    student: String,
    tutor: String,
}

#[derive(Deserialize)]
struct RawTemplates {
    instruction_template: String,
    dialogue_template: RawDialogueTemplate,
    history_format: RawHistoryFormat,
}

/// Validated prompt templates, read-only for the run.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub instruction_template: String,
    pub input_format: FormatString,
    pub output_format: FormatString,
    pub history_student: FormatString,
    pub history_tutor: FormatString,
}

impl PromptTemplates {
    pub fn new(
        instruction_template: &str,
        input_format: &str,
        output_format: &str,
        history_student: &str,
        history_tutor: &str,
    ) -> Result<Self> {
        let input_format = FormatString::parse(INPUT_FORMAT, input_format)?;
        input_format.check_placeholders(INPUT_FORMAT, &[HISTORY, STUDENT_MESSAGE])?;

        let output_format = FormatString::parse(OUTPUT_FORMAT, output_format)?;
        output_format.check_placeholders(OUTPUT_FORMAT, &[TUTOR_MESSAGE])?;

        let history_student = FormatString::parse(HISTORY_STUDENT, history_student)?;
        history_student.check_placeholders(HISTORY_STUDENT, &[MESSAGE])?;

        let history_tutor = FormatString::parse(HISTORY_TUTOR, history_tutor)?;
        history_tutor.check_placeholders(HISTORY_TUTOR, &[MESSAGE])?;

        Ok(Self {
            instruction_template: instruction_template.to_string(),
            input_format,
            output_format,
            history_student,
            history_tutor,
        })
    }
}

/// Load and validate the templates JSON file.
pub fn load_templates(path: &Path) -> Result<PromptTemplates> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawTemplates = serde_json::from_str(&text).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    PromptTemplates::new(
        &raw.instruction_template,
        &raw.dialogue_template.input_format,
        &raw.dialogue_template.output_format,
        &raw.history_format.student,
        &raw.history_format.tutor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_named_placeholders() {
        let fmt = FormatString::parse("t", "{history}Student: {student_message}").unwrap();
        let out = fmt
            .render(&[(HISTORY, "S: Hi\n"), (STUDENT_MESSAGE, "How are you")])
            .unwrap();
        assert_eq!(out, "S: Hi\nStudent: How are you");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let fmt = FormatString::parse("t", "{{json}}: {message}}}").unwrap();
        assert_eq!(fmt.render(&[(MESSAGE, "x")]).unwrap(), "{json}: x}");
        assert_eq!(fmt.placeholders().collect::<Vec<_>>(), vec![MESSAGE]);
    }

    #[test]
    fn values_are_not_rescanned() {
        let fmt = FormatString::parse("t", "T: {message}").unwrap();
        assert_eq!(fmt.render(&[(MESSAGE, "{history}")]).unwrap(), "T: {history}");
    }

    #[test]
    fn stray_brace_is_a_syntax_error() {
        for bad in ["Student: {", "oops }", "{a{b}"] {
            let err = FormatString::parse("slot", bad).unwrap_err();
            assert!(matches!(err, DatasetError::TemplateSyntax { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn positional_and_spec_fields_are_rejected() {
        for bad in ["{}", "{0}", "{message!r}", "{message:>4}"] {
            let err = FormatString::parse("slot", bad).unwrap_err();
            assert!(matches!(err, DatasetError::TemplateSyntax { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn missing_argument_fails_render() {
        let fmt = FormatString::parse("t", "{message}").unwrap();
        let err = fmt.render(&[]).unwrap_err();
        assert!(matches!(err, DatasetError::MissingArgument { name } if name == MESSAGE));
    }

    #[test]
    fn unknown_placeholder_fails_validation() {
        let err = PromptTemplates::new(
            "Teach.",
            "{history}{student}",
            "{tutor_message}",
            "S: {message}",
            "T: {message}",
        )
        .unwrap_err();
        match err {
            DatasetError::UnknownPlaceholder { slot, name } => {
                assert_eq!(slot, INPUT_FORMAT);
                assert_eq!(name, "student");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn omitted_placeholder_is_allowed() {
        let templates =
            PromptTemplates::new("Teach.", "{student_message}", "{tutor_message}", "{message}", "")
                .unwrap();
        assert_eq!(templates.history_tutor.render(&[]).unwrap(), "");
    }

    #[test]
    fn load_templates_reads_nested_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompt_templates.json");
        fs::write(
            &path,
            r#"{
                "system_template": "ignored",
                "instruction_template": "Respond as a tutor.",
                "dialogue_template": {
                    "input_format": "{history}Student: {student_message}",
                    "output_format": "Tutor: {tutor_message}"
                },
                "history_format": {"student": "S: {message}", "tutor": "T: {message}"}
            }"#,
        )
        .unwrap();

        let templates = load_templates(&path).unwrap();
        assert_eq!(templates.instruction_template, "Respond as a tutor.");
        assert_eq!(
            templates.output_format.render(&[(TUTOR_MESSAGE, "Hi")]).unwrap(),
            "Tutor: Hi"
        );
    }

    #[test]
    fn load_templates_requires_history_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompt_templates.json");
        fs::write(
            &path,
            r#"{"instruction_template": "x",
                "dialogue_template": {"input_format": "", "output_format": ""}}"#,
        )
        .unwrap();

        let err = load_templates(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Json { .. }));
        assert!(err.to_string().contains("history_format"));
    }
}
