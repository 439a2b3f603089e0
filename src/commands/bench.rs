//! Benchmark command implementation
//!
//! For every annotated question: build a prompt (plain, RAG, or with the
//! pruned-schema highlight), send it to the completion server, and record
//! the generated SQL. Predictions are saved after every item so an
//! interrupted run resumes where it stopped.

use crate::backend::CompletionClient;
use crate::config::Config;
use crate::data::{self, PredictionSet};
use crate::db::EvalDb;
use crate::error::{Error, Result};
use crate::progress;
use crate::prompt;
use crate::schema;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Benchmark run options
#[derive(Debug, Clone, Default)]
pub struct BenchOptions {
    /// Augment prompts with few-shot examples (and the live schema when
    /// `rag.dynamic_schema` is set)
    pub rag: bool,
    /// Highlight question-relevant tables ahead of the full schema
    pub prune_schema: bool,
    /// Stop after this many new predictions
    pub limit: Option<usize>,
    /// Override the configured generation budget
    pub max_tokens: Option<u32>,
}

/// Benchmark run summary
#[derive(Debug, Clone, Serialize)]
pub struct BenchSummary {
    pub total_items: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Execute a benchmark run
pub async fn cmd_bench(config: &Config, options: BenchOptions) -> Result<BenchSummary> {
    let schema_text = if options.rag && config.rag.dynamic_schema {
        let db = EvalDb::open(&config.data.database_file).await?;
        db.fetch_schema().await?
    } else {
        std::fs::read_to_string(&config.data.schema_file)?
    };
    if schema_text.trim().is_empty() {
        return Err(Error::Data("Schema context is empty".to_string()));
    }

    let items = data::load_benchmark(&config.data.benchmark_file)?;

    let mut predictions = PredictionSet::load_or_default(&config.data.predictions_file);
    if !predictions.is_empty() {
        info!(
            "Resuming: {} predictions already in {}",
            predictions.len(),
            config.data.predictions_file.display()
        );
    }

    let examples_block = if options.rag {
        let pool = data::load_few_shot(&config.data.few_shot_file)?;
        let sampled = prompt::sample_examples(&pool, config.rag.few_shot_k, config.rag.seed);
        info!("Using {} few-shot examples", sampled.len());
        prompt::format_examples(&sampled)
    } else {
        String::new()
    };

    let client = CompletionClient::new(
        &config.server.url,
        config.server.timeout_secs,
        config.server.retries,
    )?;
    let n_predict = options.max_tokens.unwrap_or(config.server.max_tokens);
    let stop = if options.rag {
        &config.rag.stop
    } else {
        &config.server.stop
    };

    let label = match (options.prune_schema, options.rag) {
        (true, _) => "bench (pruned)",
        (false, true) => "bench (rag)",
        (false, false) => "bench",
    };
    let bar = progress::item_bar(items.len() as u64, label);

    let mut summary = BenchSummary {
        total_items: items.len(),
        processed: 0,
        skipped: 0,
        failed: 0,
    };

    for item in &items {
        bar.inc(1);

        let (Some(id), Some(question)) = (&item.id, &item.question) else {
            debug!("Skipping item with missing id or question");
            summary.skipped += 1;
            continue;
        };
        if predictions.contains(id) {
            summary.skipped += 1;
            continue;
        }
        if let Some(limit) = options.limit {
            if summary.processed >= limit {
                break;
            }
        }

        let full_prompt = if options.prune_schema {
            let pruned = schema::prune_schema(&schema_text, question);
            debug!("Pruned schema to {} tables for {}", pruned.len(), id);
            prompt::pruned_prompt(&schema_text, &pruned, question)
        } else if options.rag {
            prompt::rag_prompt(&schema_text, &examples_block, question)
        } else {
            prompt::plain_prompt(&schema_text, question)
        };

        // One unreachable response must not sink the whole run; the error
        // sentinel keeps the item visible in the prediction file.
        let generated = match client.complete(&full_prompt, n_predict, stop).await {
            Ok(sql) => sql,
            Err(e) => {
                warn!("Inference failed for {}: {}", id, e);
                summary.failed += 1;
                format!("ERROR: Failed to get response from server for question: {question}")
            }
        };

        info!("{}: {}", id, generated.replace('\n', " "));
        predictions.insert(id.clone(), generated);
        predictions.save(&config.data.predictions_file)?;
        summary.processed += 1;
    }
    bar.finish_and_clear();

    info!(
        "Benchmark finished; predictions saved to {}",
        config.data.predictions_file.display()
    );
    Ok(summary)
}

/// Print a benchmark summary to console
pub fn print_bench_summary(summary: &BenchSummary) {
    println!("\n✓ Benchmark complete");
    println!("  Items: {}", summary.total_items);
    println!("  Processed: {}", summary.processed);
    println!("  Skipped: {}", summary.skipped);
    if summary.failed > 0 {
        println!("  Failed: {}", summary.failed);
    }
}
