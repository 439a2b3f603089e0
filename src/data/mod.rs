//! Benchmark, prediction and fine-tuning data files
//!
//! All pipeline stages exchange plain JSON files: an annotated benchmark
//! list, prediction maps keyed by item id, few-shot example pairs, and a
//! JSONL fine-tuning dataset. This module holds the serde types and the
//! load/save helpers around them.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One annotated benchmark item.
///
/// Fields are optional because upstream annotation files contain partially
/// filled rows; consumers skip incomplete items instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl BenchmarkItem {
    /// Unanswerable questions carry the literal string "null" as their query.
    pub fn is_unanswerable(&self) -> bool {
        self.query
            .as_deref()
            .map_or(true, |q| q.eq_ignore_ascii_case("null"))
    }
}

/// Load the annotated benchmark file (a JSON array of items).
pub fn load_benchmark(path: &Path) -> Result<Vec<BenchmarkItem>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// A worked question/SQL pair used to steer the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FewShotExample {
    pub question: String,
    pub query: String,
}

/// Load the few-shot example pool (a JSON array of pairs).
pub fn load_few_shot(path: &Path) -> Result<Vec<FewShotExample>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// One line of the supervised fine-tuning dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinetuneRecord {
    pub text: String,
}

/// A mapping of benchmark item id to predicted SQL, persisted as a single
/// JSON object. Used both for raw model output and for cleaned predictions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionSet {
    entries: BTreeMap<String, String>,
}

impl PredictionSet {
    /// Load a prediction file, failing if it is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a prediction file for resuming: a missing or unreadable file
    /// starts an empty run instead of aborting.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the set as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn insert(&mut self, id: String, sql: String) {
        self.entries.insert(id, sql);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    /// Count entries that are non-empty here but empty (or absent) in
    /// `previous` - queries this cleaning pass recovered.
    pub fn recovered_from(&self, previous: &PredictionSet) -> usize {
        self.entries
            .iter()
            .filter(|(id, sql)| {
                !sql.is_empty() && previous.get(id).map_or(true, str::is_empty)
            })
            .count()
    }
}

impl FromIterator<(String, String)> for PredictionSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_benchmark_item_unanswerable() {
        let item: BenchmarkItem =
            serde_json::from_str(r#"{"id": "q1", "question": "?", "query": "null"}"#).unwrap();
        assert!(item.is_unanswerable());

        let item: BenchmarkItem =
            serde_json::from_str(r#"{"id": "q2", "question": "?", "query": "SELECT 1"}"#).unwrap();
        assert!(!item.is_unanswerable());

        let item: BenchmarkItem = serde_json::from_str(r#"{"id": "q3"}"#).unwrap();
        assert!(item.is_unanswerable());
    }

    #[test]
    fn test_prediction_set_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("res").join("prediction.json");

        let mut set = PredictionSet::default();
        set.insert("q1".to_string(), "SELECT 1".to_string());
        set.insert("q2".to_string(), String::new());
        set.save(&path).unwrap();

        let loaded = PredictionSet::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("q1"), Some("SELECT 1"));
        assert_eq!(loaded.get("q2"), Some(""));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let set = PredictionSet::load_or_default(&tmp.path().join("absent.json"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_recovered_from() {
        let previous: PredictionSet = [
            ("q1".to_string(), String::new()),
            ("q2".to_string(), "SELECT 2".to_string()),
        ]
        .into_iter()
        .collect();

        let cleaned: PredictionSet = [
            ("q1".to_string(), "SELECT 1".to_string()), // empty -> non-empty
            ("q2".to_string(), "SELECT 2".to_string()), // already non-empty
            ("q3".to_string(), "SELECT 3".to_string()), // absent counts as empty
            ("q4".to_string(), String::new()),          // still empty
        ]
        .into_iter()
        .collect();

        assert_eq!(cleaned.recovered_from(&previous), 2);
    }
}
