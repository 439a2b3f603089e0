//! Prompt assembly for benchmark runs and dataset preparation
//!
//! The section markers (`### Instruction:`, `### SQL:`) double as stop
//! sequences on the server side, so the templates here and the configured
//! stop strings have to stay in sync.

use crate::data::FewShotExample;
use rand::prelude::*;

/// Zero-shot prompt: instruction, schema, question.
pub fn plain_prompt(schema: &str, question: &str) -> String {
    format!(
        "### Instruction:\n\
         You are a SQL expert. Given a database schema and a question, your job is to write a syntactically correct SQL query.\n\n\
         ### Schema:\n{schema}\n\n\
         ### Question:\n{question}\n\n\
         ### SQL:\n"
    )
}

/// RAG prompt: instruction, schema, few-shot examples, question.
pub fn rag_prompt(schema: &str, examples: &str, question: &str) -> String {
    format!(
        "### Instruction:\n\
         You are an expert SQLite developer. Your task is to convert a question into a syntactically correct SQLite query.\n\
         - Use the provided database schema and examples to inform your query.\n\
         - Use table aliases to prevent ambiguity.\n\n\
         ### Database Schema:\n{schema}\n\n\
         ### Examples:\n{examples}\n\n\
         ### Question:\n{question}\n\n\
         ### SQL:\n"
    )
}

/// Pruning prompt: the relevant tables are highlighted ahead of the full
/// schema. Pruning never replaces the schema, it only flags what matters;
/// when nothing matched, only the full-schema marker appears.
pub fn pruned_prompt(full_schema: &str, pruned: &[String], question: &str) -> String {
    let important_tables = if pruned.is_empty() {
        "-- FULL SCHEMA:".to_string()
    } else {
        format!("-- IMPORTANT TABLES:\n{}\n\n-- FULL SCHEMA:", pruned.join("\n\n"))
    };
    format!(
        "### Instruction:\n\
         You are a SQL expert. Given a database schema and a question, your job is to write a syntactically correct SQL query.\n\n\
         ### Database Schema:\n{important_tables}\n{full_schema}\n\n\
         ### Question:\n{question}\n\n\
         ### SQL:\n"
    )
}

/// Full instructional text for one fine-tuning record. The model learns to
/// fill in everything after the `### SQL:` marker.
pub fn finetune_text(schema: &str, question: &str, sql: &str) -> String {
    format!(
        "### Instruction:\n\
         You are an expert SQLite developer. Your task is to convert a question into a syntactically correct SQLite query. Use the provided database schema.\n\n\
         ### Schema:\n{schema}\n\n\
         ### Question:\n{question}\n\n\
         ### SQL:\n{sql}"
    )
}

/// Format selected few-shot examples as a prompt block.
pub fn format_examples(examples: &[FewShotExample]) -> String {
    let mut block = String::new();
    for ex in examples {
        block.push_str(&format!("Question: {}\nSQL: {}\n\n", ex.question, ex.query));
    }
    block
}

/// Randomly sample up to `k` few-shot examples from the pool.
///
/// A seed makes the selection reproducible across runs; without one the
/// thread RNG is used, matching ordinary benchmark usage.
pub fn sample_examples(
    pool: &[FewShotExample],
    k: usize,
    seed: Option<u64>,
) -> Vec<FewShotExample> {
    let k = k.min(pool.len());
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            pool.choose_multiple(&mut rng, k).cloned().collect()
        }
        None => {
            let mut rng = thread_rng();
            pool.choose_multiple(&mut rng, k).cloned().collect()
        }
    }
}
