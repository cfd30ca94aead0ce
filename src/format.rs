//! Dialogue to instruction-tuning example conversion.

use crate::dialogue::{Dialogue, Role, Turn};
use crate::error::Result;
use crate::templates::{HISTORY, MESSAGE, PromptTemplates, STUDENT_MESSAGE, TUTOR_MESSAGE};
use serde::{Deserialize, Serialize};

/// One instruction-tuning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub instruction: String,
    pub input: String,
    pub output: String,
}

/// Turn one dialogue into examples, one per accepted student/tutor pair.
///
/// Turns are read in pairs at even offsets. A pair whose roles are not
/// student then tutor is skipped and leaves the history untouched; a
/// trailing unpaired turn is dropped. Every accepted pair sees all earlier
/// accepted exchanges, rendered with the history templates, as its history.
pub fn format_dialogue(
    turns: &[Turn],
    templates: &PromptTemplates,
    instruction_template: &str,
) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    let mut history: Vec<String> = Vec::new();

    for (pair_idx, pair) in turns.chunks(2).enumerate() {
        let [student, tutor] = pair else {
            tracing::debug!(turn = pair_idx * 2, "dropping trailing unpaired turn");
            break;
        };
        if student.role != Role::Student || tutor.role != Role::Tutor {
            tracing::debug!(turn = pair_idx * 2, "skipping pair with unexpected roles");
            continue;
        }

        let mut history_text = history.join("\n");
        if !history_text.is_empty() {
            history_text.push('\n');
        }

        let input = templates.input_format.render(&[
            (HISTORY, history_text.as_str()),
            (STUDENT_MESSAGE, student.content.as_str()),
        ])?;
        let output = templates
            .output_format
            .render(&[(TUTOR_MESSAGE, tutor.content.as_str())])?;

        examples.push(Example {
            instruction: instruction_template.to_string(),
            input,
            output,
        });

        history.push(templates.history_student.render(&[(MESSAGE, student.content.as_str())])?);
        history.push(templates.history_tutor.render(&[(MESSAGE, tutor.content.as_str())])?);
    }

    Ok(examples)
}

/// Format every dialogue, concatenating examples in source order.
pub fn format_all(dialogues: &[Dialogue], templates: &PromptTemplates) -> Result<Vec<Example>> {
    let instruction_template = templates.instruction_template.as_str();

    let mut examples = Vec::new();
    for dialogue in dialogues {
        examples.extend(format_dialogue(&dialogue.turns, templates, instruction_template)?);
    }

    tracing::info!("Created {} training examples", examples.len());
    Ok(examples)
}
