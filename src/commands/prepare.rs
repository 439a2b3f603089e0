//! Prepare command implementation
//!
//! Converts the annotated training data into a JSONL file for supervised
//! fine-tuning: one `{"text": ...}` record per valid question/SQL pair,
//! with the full instructional prompt rendered into `text`.

use crate::config::Config;
use crate::data::{self, FinetuneRecord};
use crate::error::{Error, Result};
use crate::prompt;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Prepare run statistics
#[derive(Debug, Clone, Serialize)]
pub struct PrepareStats {
    pub written: usize,
    pub skipped: usize,
    pub output: PathBuf,
}

/// Build the fine-tuning dataset
pub fn cmd_prepare(config: &Config) -> Result<PrepareStats> {
    let schema_text = fs::read_to_string(&config.data.schema_file)?;
    if schema_text.trim().is_empty() {
        return Err(Error::Data("Schema file is empty".to_string()));
    }

    let items = data::load_benchmark(&config.data.train_file)?;

    let output = config.data.finetune_file.clone();
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(&output)?);

    let mut written = 0;
    let mut skipped = 0;
    for item in &items {
        let (Some(question), Some(sql)) = (&item.question, &item.query) else {
            skipped += 1;
            continue;
        };
        if item.is_unanswerable() {
            skipped += 1;
            continue;
        }

        let record = FinetuneRecord {
            text: prompt::finetune_text(&schema_text, question, sql),
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;

    info!(
        "Created fine-tuning dataset with {} records at {}",
        written,
        output.display()
    );
    Ok(PrepareStats {
        written,
        skipped,
        output,
    })
}

/// Print prepare statistics to console
pub fn print_prepare_stats(stats: &PrepareStats) {
    println!("\n✓ Fine-tuning dataset ready");
    println!("  Records written: {}", stats.written);
    println!("  Items skipped: {}", stats.skipped);
    println!("  Output: {}", stats.output.display());
}
