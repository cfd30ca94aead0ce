//! End-to-end preprocessing: load, format, split, write.

use crate::config::load_training_config;
use crate::dialogue::load_dialogues;
use crate::error::{DatasetError, Result};
use crate::format::format_all;
use crate::split::split;
use crate::templates::load_templates;
use crate::writer::write_jsonl;
use std::fs;
use std::path::{Path, PathBuf};

pub const TRAIN_FILE: &str = "train.jsonl";
pub const TEST_FILE: &str = "test.jsonl";

#[derive(Debug, Clone)]
pub struct PreprocessPaths {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub templates_path: PathBuf,
    pub training_config_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessSummary {
    pub dialogues: usize,
    pub examples: usize,
    pub train: usize,
    pub test: usize,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn publish(staged: &Path, target: &Path) -> Result<()> {
    fs::rename(staged, target).map_err(|source| DatasetError::Write {
        path: target.to_path_buf(),
        source,
    })
}

/// Run the whole pipeline. Both output files are staged next to their final
/// names and only moved into place once both have been written.
pub fn preprocess(paths: &PreprocessPaths) -> Result<PreprocessSummary> {
    fs::create_dir_all(&paths.output_dir).map_err(|source| DatasetError::Write {
        path: paths.output_dir.clone(),
        source,
    })?;

    let templates = load_templates(&paths.templates_path)?;
    let config = load_training_config(&paths.training_config_path)?;
    let dialogues = load_dialogues(&paths.input_file)?;

    let examples = format_all(&dialogues, &templates)?;
    let n_examples = examples.len();

    let (train, test) = split(examples, config.data.train_test_split, config.data.rng_seed());

    let train_path = paths.output_dir.join(TRAIN_FILE);
    let test_path = paths.output_dir.join(TEST_FILE);
    let train_staged = staging_path(&train_path);
    let test_staged = staging_path(&test_path);

    let written = write_jsonl(&train_staged, &train).and_then(|_| write_jsonl(&test_staged, &test));
    if let Err(e) = written {
        let _ = fs::remove_file(&train_staged);
        let _ = fs::remove_file(&test_staged);
        return Err(e);
    }
    if let Err(e) = publish(&train_staged, &train_path) {
        let _ = fs::remove_file(&train_staged);
        let _ = fs::remove_file(&test_staged);
        return Err(e);
    }
    // A lone train.jsonl would pair with a stale or missing test.jsonl.
    if let Err(e) = publish(&test_staged, &test_path) {
        let _ = fs::remove_file(&test_staged);
        let _ = fs::remove_file(&train_path);
        return Err(e);
    }

    tracing::info!("Preprocessing complete. Files saved to {}", paths.output_dir.display());

    Ok(PreprocessSummary {
        dialogues: dialogues.len(),
        examples: n_examples,
        train: train.len(),
        test: test.len(),
        train_path,
        test_path,
    })
}
