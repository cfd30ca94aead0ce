//! Error types for the preprocessing pipeline.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A dialogue line that cannot be parsed, or lacks `turns`, `role` or `content`.
    #[error("invalid dialogue at {path}:{line}: {source}")]
    Dialogue {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed template '{slot}': {message}")]
    TemplateSyntax { slot: String, message: String },

    #[error("template '{slot}' uses unknown placeholder '{{{name}}}'")]
    UnknownPlaceholder { slot: String, name: String },

    #[error("no value supplied for placeholder '{{{name}}}'")]
    MissingArgument { name: String },

    #[error("invalid configuration value for '{field}': {message}")]
    ConfigValue { field: String, message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
