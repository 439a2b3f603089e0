//! Clean command implementation
//!
//! Runs the extraction cascade over every raw prediction and writes the
//! cleaned set. An optional prior cleaned file is compared to count how
//! many previously empty extractions were recovered.

use crate::config::Config;
use crate::data::PredictionSet;
use crate::error::Result;
use crate::extract::extract_sql;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Clean run options
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Raw prediction file; defaults to the configured predictions file
    pub input: Option<PathBuf>,
    /// Cleaned output; defaults to the configured cleaned file
    pub output: Option<PathBuf>,
    /// Prior cleaned file to compute the recovered count against
    pub previous: Option<PathBuf>,
}

/// Clean run statistics
#[derive(Debug, Clone, Serialize)]
pub struct CleanStats {
    pub total: usize,
    pub non_empty: usize,
    pub empty: usize,
    /// Only present when a prior cleaned file was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered: Option<usize>,
    pub output: PathBuf,
}

/// Clean a raw prediction file
pub fn cmd_clean(config: &Config, options: CleanOptions) -> Result<CleanStats> {
    let input = options
        .input
        .unwrap_or_else(|| config.data.predictions_file.clone());
    let output = options
        .output
        .unwrap_or_else(|| config.data.cleaned_file.clone());

    info!("Cleaning predictions from {}", input.display());
    let raw = PredictionSet::load(&input)?;

    let cleaned: PredictionSet = raw
        .iter()
        .map(|(id, text)| (id.clone(), extract_sql(text)))
        .collect();

    let recovered = options.previous.map(|path| {
        let previous = PredictionSet::load_or_default(&path);
        let count = cleaned.recovered_from(&previous);
        for (id, sql) in cleaned.iter() {
            if !sql.is_empty() && previous.get(id).map_or(true, str::is_empty) {
                debug!("Recovered query for {}", id);
            }
        }
        count
    });

    cleaned.save(&output)?;

    let non_empty = cleaned.iter().filter(|(_, sql)| !sql.is_empty()).count();
    let stats = CleanStats {
        total: cleaned.len(),
        non_empty,
        empty: cleaned.len() - non_empty,
        recovered,
        output,
    };
    info!(
        "Cleaned {} predictions ({} empty)",
        stats.total, stats.empty
    );
    Ok(stats)
}

/// Print clean statistics to console
pub fn print_clean_stats(stats: &CleanStats) {
    println!("\n✓ Cleaning complete");
    println!("  Predictions: {}", stats.total);
    println!("  Extracted: {}", stats.non_empty);
    println!("  Empty: {}", stats.empty);
    if let Some(recovered) = stats.recovered {
        println!("  Recovered vs previous pass: {}", recovered);
    }
    println!("  Output: {}", stats.output.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_json(path: &std::path::Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_clean_extracts_and_counts() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("prediction.json");
        let output = tmp.path().join("prediction_cleaned.json");
        write_json(
            &input,
            r#"{
                "q1": "```sql\nSELECT 1\n```",
                "q2": "no sql here",
                "q3": "answer: select * from labs"
            }"#,
        );

        let config = Config::default();
        let stats = cmd_clean(
            &config,
            CleanOptions {
                input: Some(input),
                output: Some(output.clone()),
                previous: None,
            },
        )
        .unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.non_empty, 2);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.recovered, None);

        let cleaned = PredictionSet::load(&output).unwrap();
        assert_eq!(cleaned.get("q1"), Some("SELECT 1"));
        assert_eq!(cleaned.get("q2"), Some(""));
        assert_eq!(cleaned.get("q3"), Some("select * from labs"));
    }

    #[test]
    fn test_clean_recovered_against_previous() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("prediction.json");
        let previous = tmp.path().join("prediction_cleaned_old.json");
        let output = tmp.path().join("prediction_cleaned.json");
        write_json(&input, r#"{"q1": "select 1", "q2": "select 2"}"#);
        write_json(&previous, r#"{"q1": "", "q2": "select 2"}"#);

        let config = Config::default();
        let stats = cmd_clean(
            &config,
            CleanOptions {
                input: Some(input),
                output: Some(output),
                previous: Some(previous),
            },
        )
        .unwrap();

        assert_eq!(stats.recovered, Some(1));
    }

    #[test]
    fn test_clean_missing_input_fails() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let result = cmd_clean(
            &config,
            CleanOptions {
                input: Some(tmp.path().join("absent.json")),
                output: Some(tmp.path().join("out.json")),
                previous: None,
            },
        );
        assert!(result.is_err());
    }
}
