//! Instruction-tuning dataset preparation for tutoring dialogues.
//!
//! Raw transcripts of alternating student/tutor turns are turned into
//! `(instruction, input, output)` examples, where each input carries the
//! conversation so far, then split into train/test sets with a seeded shuffle
//! and written as JSONL.
//!
//! - `dialogue`: transcript model and JSONL loader
//! - `templates`: prompt templates and named-placeholder format strings
//! - `config`: training configuration (split ratio and seed)
//! - `format`: per-dialogue and batch example formatting
//! - `split`: deterministic train/test partitioning
//! - `writer`: JSONL output
//! - `pipeline`: the end-to-end run

pub mod config;
pub mod dialogue;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod split;
pub mod templates;
pub mod writer;

pub use config::TrainingConfig;
pub use dialogue::{Dialogue, Role, Turn};
pub use error::{DatasetError, Result};
pub use format::{Example, format_all, format_dialogue};
pub use pipeline::{PreprocessPaths, PreprocessSummary, preprocess};
pub use split::split;
pub use templates::PromptTemplates;
