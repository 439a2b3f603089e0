//! Default values for configuration

use std::path::PathBuf;

/// Default completion server URL (llama.cpp server)
pub fn default_server_url() -> String {
    std::env::var("SQLBENCH_SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:8081".to_string())
}

/// Default generation budget in tokens
pub fn default_max_tokens() -> u32 {
    256
}

/// Default stop sequences (the prompt section marker)
pub fn default_stop() -> Vec<String> {
    vec!["###".to_string()]
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    120
}

/// Default retry count for completion requests
pub fn default_retries() -> usize {
    2
}

/// Default schema definition file
pub fn default_schema_file() -> PathBuf {
    PathBuf::from("evaluation_data/schema.sql")
}

/// Default reference SQLite database
pub fn default_database_file() -> PathBuf {
    PathBuf::from("evaluation_data/eval.sqlite")
}

/// Default annotated benchmark file
pub fn default_benchmark_file() -> PathBuf {
    PathBuf::from("evaluation_data/annotated.json")
}

/// Default raw prediction output file
pub fn default_predictions_file() -> PathBuf {
    PathBuf::from("results/prediction.json")
}

/// Default cleaned prediction output file
pub fn default_cleaned_file() -> PathBuf {
    PathBuf::from("results/prediction_cleaned.json")
}

/// Default few-shot example pool
pub fn default_few_shot_file() -> PathBuf {
    PathBuf::from("evaluation_data/few_shot_examples.json")
}

/// Default annotated training data file
pub fn default_train_file() -> PathBuf {
    PathBuf::from("train_data/annotated.json")
}

/// Default fine-tuning dataset output (JSONL)
pub fn default_finetune_file() -> PathBuf {
    PathBuf::from("train_data/finetune_data.jsonl")
}

/// Default number of few-shot examples per prompt
pub fn default_few_shot_k() -> usize {
    3
}

/// Default stop sequences for RAG runs (cut generation at the first
/// statement end or blank line as well)
pub fn default_rag_stop() -> Vec<String> {
    vec!["###".to_string(), ";".to_string(), "\n\n".to_string()]
}

/// Default: retrieve the schema live from the database in RAG mode
pub fn default_dynamic_schema() -> bool {
    true
}
