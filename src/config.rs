use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Data section of the training configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Fraction of examples held out for the test set, in (0, 1).
    pub train_test_split: f64,
    pub seed: i64,
}

impl DataConfig {
    /// Seed handed to the shuffle generator: the configured value reinterpreted
    /// as two's complement, so `-1` becomes `u64::MAX`.
    pub fn rng_seed(&self) -> u64 {
        self.seed as u64
    }
}

/// The parts of the training configuration this pipeline reads.
/// Model and optimizer sections in the same file are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingConfig {
    pub data: DataConfig,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        let ratio = self.data.train_test_split;
        if !(ratio.is_finite() && ratio > 0.0 && ratio < 1.0) {
            return Err(DatasetError::ConfigValue {
                field: "data.train_test_split".to_string(),
                message: format!("expected a fraction strictly between 0 and 1, got {}", ratio),
            });
        }
        Ok(())
    }
}

pub fn load_training_config(path: &Path) -> Result<TrainingConfig> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TrainingConfig =
        serde_json::from_str(&text).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
