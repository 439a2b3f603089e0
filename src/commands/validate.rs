//! Validate command implementation
//!
//! Executes every ground-truth query against the reference database to
//! catch annotation errors before they skew benchmark scores. One query's
//! failure never aborts the batch; failures are collected and reported.

use crate::config::Config;
use crate::data;
use crate::db::EvalDb;
use crate::error::Result;
use crate::progress;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

/// A ground-truth query the database rejected
#[derive(Debug, Clone, Serialize)]
pub struct QueryFailure {
    pub id: String,
    pub query: String,
    pub error: String,
}

/// Ground-truth validation report
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub passed: usize,
    pub failures: Vec<QueryFailure>,
    pub generated_at: String,
}

/// Validate all ground-truth queries against the reference database
pub async fn cmd_validate(config: &Config) -> Result<ValidationReport> {
    let db = EvalDb::open(&config.data.database_file).await?;
    let items = data::load_benchmark(&config.data.benchmark_file)?;

    info!(
        "Validating ground truth from {} against {}",
        config.data.benchmark_file.display(),
        config.data.database_file.display()
    );

    let bar = progress::item_bar(items.len() as u64, "validate");
    let mut report = ValidationReport {
        total: 0,
        passed: 0,
        failures: Vec::new(),
        generated_at: Utc::now().to_rfc3339(),
    };

    for item in &items {
        bar.inc(1);

        let (Some(id), Some(query)) = (&item.id, &item.query) else {
            continue;
        };
        if item.is_unanswerable() {
            debug!("Skipping unanswerable item {}", id);
            continue;
        }

        report.total += 1;
        match db.check_query(query).await {
            None => report.passed += 1,
            Some(error) => report.failures.push(QueryFailure {
                id: id.clone(),
                query: query.clone(),
                error,
            }),
        }
    }
    bar.finish_and_clear();

    info!(
        "Validation complete: {}/{} queries passed",
        report.passed, report.total
    );
    Ok(report)
}

/// Print a validation report to console
pub fn print_validation_report(report: &ValidationReport) {
    println!("\n--- Ground Truth Validation ---");
    println!("  Queries tested: {}", report.total);
    println!("  Successful: {}", report.passed);
    println!("  Failed: {}", report.failures.len());

    if report.failures.is_empty() {
        println!("\n✓ All ground-truth queries executed successfully");
        return;
    }

    println!("\n--- Failed Queries ---");
    for failure in &report.failures {
        println!("ID: {}", failure.id);
        println!("  Query: {}", failure.query);
        println!("  Error: {}\n", failure.error);
    }
}
