//! Status command implementation

use crate::config::Config;
use crate::data::{self, PredictionSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Presence (and item count, where cheap) of one pipeline file
#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub label: String,
    pub path: PathBuf,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
}

/// Pipeline status report
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub config_path: PathBuf,
    pub server_url: String,
    pub files: Vec<FileStatus>,
}

fn file_status(label: &str, path: &Path, items: Option<usize>) -> FileStatus {
    FileStatus {
        label: label.to_string(),
        path: path.to_path_buf(),
        exists: path.exists(),
        items,
    }
}

/// Gather pipeline status: configured locations, which files exist, and how
/// many items the countable ones hold.
pub fn cmd_status(config: &Config) -> StatusReport {
    let benchmark_items = data::load_benchmark(&config.data.benchmark_file)
        .ok()
        .map(|items| items.len());
    let prediction_items = PredictionSet::load(&config.data.predictions_file)
        .ok()
        .map(|set| set.len());

    StatusReport {
        config_path: config.config_path.clone(),
        server_url: config.server.url.clone(),
        files: vec![
            file_status("Schema", &config.data.schema_file, None),
            file_status("Database", &config.data.database_file, None),
            file_status("Benchmark", &config.data.benchmark_file, benchmark_items),
            file_status(
                "Predictions",
                &config.data.predictions_file,
                prediction_items,
            ),
            file_status("Few-shot pool", &config.data.few_shot_file, None),
            file_status("Train data", &config.data.train_file, None),
        ],
    }
}

/// Print a status report to console
pub fn print_status(report: &StatusReport) {
    println!("sqlbench status");
    println!("  Config: {}", report.config_path.display());
    println!("  Server: {}", report.server_url);
    println!("\nFiles:");
    for file in &report.files {
        let mark = if file.exists { "✓" } else { "✗" };
        match file.items {
            Some(count) => println!(
                "  {} {}: {} ({} items)",
                mark,
                file.label,
                file.path.display(),
                count
            ),
            None => println!("  {} {}: {}", mark, file.label, file.path.display()),
        }
    }
}
