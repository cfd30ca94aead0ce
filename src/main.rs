//! Convert tutoring dialogues to instruction-tuning train/test sets.
//!
//! Reads: a JSONL file of dialogues (`{"turns": [{"role", "content"}, ...]}`)
//! Writes: <output_dir>/train.jsonl and <output_dir>/test.jsonl

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tutor_dataset::{PreprocessPaths, preprocess};

#[derive(Parser)]
#[command(name = "tutor-dataset")]
#[command(about = "Preprocess dialogue data for language tutor training")]
struct Cli {
    /// Path to raw dialogues JSONL file
    #[arg(long = "input_file", visible_alias = "input-file", env = "TUTOR_INPUT_FILE")]
    input_file: PathBuf,

    /// Directory to save processed data
    #[arg(
        long = "output_dir",
        visible_alias = "output-dir",
        env = "TUTOR_OUTPUT_DIR",
        default_value = "training/data/processed"
    )]
    output_dir: PathBuf,

    /// Path to templates JSON file
    #[arg(
        long = "templates_path",
        visible_alias = "templates-path",
        env = "TUTOR_TEMPLATES_PATH",
        default_value = "training/configs/prompt_templates.json"
    )]
    templates_path: PathBuf,

    /// Path to training configuration JSON file
    #[arg(
        long = "training_config_path",
        visible_alias = "training-config-path",
        env = "TUTOR_TRAINING_CONFIG_PATH",
        default_value = "training/configs/training_config.json"
    )]
    training_config_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let paths = PreprocessPaths {
        input_file: cli.input_file,
        output_dir: cli.output_dir,
        templates_path: cli.templates_path,
        training_config_path: cli.training_config_path,
    };

    let summary = preprocess(&paths)?;

    println!("\n{}", "=".repeat(60));
    println!("DIALOGUES: {}", summary.dialogues);
    println!("EXAMPLES:  {}", summary.examples);
    println!("\nTRAINING SET: {} examples", summary.train);
    println!("Output: {}", summary.train_path.display());
    println!("\nTEST SET: {} examples (held out)", summary.test);
    println!("Output: {}", summary.test_path.display());

    Ok(())
}
