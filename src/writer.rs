//! JSONL persistence for examples.

use crate::error::{DatasetError, Result};
use crate::format::Example;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write `examples` to `path`, one JSON object per line. Non-ASCII text is
/// written as-is.
pub fn write_jsonl(path: &Path, examples: &[Example]) -> Result<()> {
    let write_err = |source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    for example in examples {
        serde_json::to_writer(&mut writer, example).map_err(|e| write_err(e.into()))?;
        writeln!(writer).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    tracing::info!("Saved {} examples to {}", examples.len(), path.display());
    Ok(())
}

/// Read examples back from a JSONL file, skipping blank lines.
pub fn read_jsonl(path: &Path) -> Result<Vec<Example>> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut examples = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let example = serde_json::from_str(&line).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        examples.push(example);
    }
    Ok(examples)
}
