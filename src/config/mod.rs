//! Configuration management for sqlbench
//!
//! Handles loading, saving, and validating configuration from TOML files.
//! Every file path and the server URL live here, passed explicitly into the
//! command entry points - there are no module-level path constants.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Pipeline data file locations
    #[serde(default)]
    pub data: DataConfig,

    /// Retrieval-augmented prompting configuration
    #[serde(default)]
    pub rag: RagConfig,

    /// Where this config was loaded from (internal, not user-editable)
    #[serde(skip)]
    pub config_path: PathBuf,
}

/// Completion server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the llama.cpp-style completion server
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Generation budget per request (n_predict)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Stop sequences for plain benchmark runs
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries per request on transient failures
    #[serde(default = "default_retries")]
    pub retries: usize,
}

/// Pipeline data file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Schema definition file (.sql text)
    #[serde(default = "default_schema_file")]
    pub schema_file: PathBuf,

    /// Reference SQLite database
    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,

    /// Annotated benchmark file (JSON array of id/question/query items)
    #[serde(default = "default_benchmark_file")]
    pub benchmark_file: PathBuf,

    /// Raw prediction output (JSON object, id -> generated text)
    #[serde(default = "default_predictions_file")]
    pub predictions_file: PathBuf,

    /// Cleaned prediction output
    #[serde(default = "default_cleaned_file")]
    pub cleaned_file: PathBuf,

    /// Few-shot example pool (JSON array of question/query pairs)
    #[serde(default = "default_few_shot_file")]
    pub few_shot_file: PathBuf,

    /// Annotated training data for dataset preparation
    #[serde(default = "default_train_file")]
    pub train_file: PathBuf,

    /// Fine-tuning dataset output (JSONL)
    #[serde(default = "default_finetune_file")]
    pub finetune_file: PathBuf,
}

/// Retrieval-augmented prompting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Few-shot examples per prompt
    #[serde(default = "default_few_shot_k")]
    pub few_shot_k: usize,

    /// Seed for example sampling; unset means non-reproducible sampling
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop sequences for RAG runs
    #[serde(default = "default_rag_stop")]
    pub stop: Vec<String>,

    /// Retrieve the schema from the live database instead of the .sql file
    #[serde(default = "default_dynamic_schema")]
    pub dynamic_schema: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            max_tokens: default_max_tokens(),
            stop: default_stop(),
            timeout_secs: default_timeout(),
            retries: default_retries(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            schema_file: default_schema_file(),
            database_file: default_database_file(),
            benchmark_file: default_benchmark_file(),
            predictions_file: default_predictions_file(),
            cleaned_file: default_cleaned_file(),
            few_shot_file: default_few_shot_file(),
            train_file: default_train_file(),
            finetune_file: default_finetune_file(),
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            few_shot_k: default_few_shot_k(),
            seed: None,
            stop: default_rag_stop(),
            dynamic_schema: default_dynamic_schema(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            rag: RagConfig::default(),
            config_path: Self::default_config_path(),
        }
    }
}

impl Config {
    /// Get the default base directory for sqlbench (~/.sqlbench)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sqlbench")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::NotInitialized);
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.config_path = config_path.to_path_buf();

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to its config path
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.config_path, content)?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.server.url)
            .map_err(|e| Error::Config(format!("server.url is not a valid URL: {}", e)))?;

        if self.server.max_tokens == 0 {
            return Err(Error::Config(
                "server.max_tokens must be positive".to_string(),
            ));
        }

        if self.server.timeout_secs == 0 {
            return Err(Error::Config(
                "server.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
