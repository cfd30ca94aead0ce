//! Raw dialogue transcripts and the JSONL loader.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Speaker of a turn. Any string is accepted on input; values other than
/// `student` and `tutor` are kept as `Other` so the formatter can skip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Student,
    Tutor,
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "student" => Role::Student,
            "tutor" => Role::Tutor,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => "student".to_string(),
            Role::Tutor => "tutor".to_string(),
            Role::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn student(content: impl Into<String>) -> Self {
        Self { role: Role::Student, content: content.into() }
    }

    pub fn tutor(content: impl Into<String>) -> Self {
        Self { role: Role::Tutor, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub turns: Vec<Turn>,
}

/// Load one dialogue per non-blank line.
pub fn load_dialogues(path: &Path) -> Result<Vec<Dialogue>> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut dialogues = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let dialogue = serde_json::from_str::<Dialogue>(&line).map_err(|source| {
            DatasetError::Dialogue {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            }
        })?;
        dialogues.push(dialogue);
    }

    tracing::info!("Loaded {} dialogues from {}", dialogues.len(), path.display());
    Ok(dialogues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_jsonl(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dialogues.jsonl");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_roles() {
        let turn: Turn = serde_json::from_str(r#"{"role": "system", "content": "x"}"#).unwrap();
        assert_eq!(turn.role, Role::Other("system".to_string()));
        let turn: Turn = serde_json::from_str(r#"{"role": "tutor", "content": "y"}"#).unwrap();
        assert_eq!(turn, Turn::tutor("y"));
    }

    #[test]
    fn skips_blank_lines() {
        let (_dir, path) = write_jsonl(concat!(
            r#"{"turns": [{"role": "student", "content": "Hola"}, {"role": "tutor", "content": "¡Hola!"}]}"#,
            "\n\n   \n",
            r#"{"id": 7, "turns": []}"#,
            "\n",
        ));
        let dialogues = load_dialogues(&path).unwrap();
        assert_eq!(dialogues.len(), 2);
        assert_eq!(dialogues[0].turns[1].content, "¡Hola!");
        assert!(dialogues[1].turns.is_empty());
    }

    #[test]
    fn missing_content_reports_line_number() {
        let (_dir, path) = write_jsonl(concat!(
            r#"{"turns": []}"#,
            "\n",
            r#"{"turns": [{"role": "student"}]}"#,
            "\n",
        ));
        match load_dialogues(&path).unwrap_err() {
            DatasetError::Dialogue { line, source, .. } => {
                assert_eq!(line, 2);
                assert!(source.to_string().contains("content"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_role_is_an_error() {
        let (_dir, path) = write_jsonl(r#"{"turns": [{"content": "hi"}]}"#);
        let err = load_dialogues(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Dialogue { line: 1, .. }));
    }

    #[test]
    fn non_string_role_is_an_error() {
        let (_dir, path) = write_jsonl(
            r#"{"turns": [{"role": null, "content": "hi"}, {"role": "tutor", "content": "yo"}]}"#,
        );
        let err = load_dialogues(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Dialogue { line: 1, .. }), "{err}");
    }

    #[test]
    fn missing_turns_is_an_error() {
        let (_dir, path) = write_jsonl(r#"{"messages": []}"#);
        assert!(load_dialogues(&path).is_err());
    }
}
