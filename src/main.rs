//! sqlbench CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sqlbench::{
    commands::{
        cmd_bench, cmd_clean, cmd_init, cmd_prepare, cmd_status, cmd_validate,
        print_bench_summary, print_clean_stats, print_prepare_stats, print_status,
        print_validation_report, BenchOptions, CleanOptions,
    },
    config::Config,
    error::Result,
    progress::ConsoleWriterFactory,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sqlbench")]
#[command(version, about = "Text-to-SQL benchmark pipeline CLI", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize sqlbench configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Run the benchmark against the completion server
    Bench {
        /// Augment prompts with few-shot examples and a live schema
        #[arg(long)]
        rag: bool,

        /// Highlight question-relevant tables ahead of the full schema
        #[arg(long, conflicts_with = "rag")]
        prune_schema: bool,

        /// Stop after this many new predictions
        #[arg(long)]
        limit: Option<usize>,

        /// Override the configured generation budget (n_predict)
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Extract SQL from raw predictions
    Clean {
        /// Raw prediction file (defaults to the configured predictions file)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Cleaned output file (defaults to the configured cleaned file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Prior cleaned file, to count recovered queries against
        #[arg(long)]
        previous: Option<PathBuf>,
    },

    /// Build the fine-tuning dataset (JSONL)
    Prepare,

    /// Validate ground-truth queries against the reference database
    Validate,

    /// Show pipeline status
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(ConsoleWriterFactory::default()))
        .with(filter)
        .init();

    // Init doesn't need an existing config
    if let Commands::Init { force } = cli.command {
        let base_dir = cli.config.as_deref().and_then(|p| {
            if p.extension().map_or(false, |e| e == "toml") {
                p.parent().map(PathBuf::from)
            } else {
                Some(p.to_path_buf())
            }
        });
        let path = cmd_init(base_dir, force)?;
        println!("✓ sqlbench initialized");
        println!("  Config: {}", path.display());
        println!("\nNext steps:");
        println!("  1. Edit the config to point at your schema, database and benchmark files");
        println!("  2. Start a completion server, e.g. llama.cpp: llama-server -m model.gguf --port 8081");
        println!("  3. Run the benchmark: sqlbench bench");
        return Ok(());
    }

    // Completions need neither config nor logging
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "sqlbench", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);
    let config = Config::load(&config_path)?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Bench {
            rag,
            prune_schema,
            limit,
            max_tokens,
        } => {
            let options = BenchOptions {
                rag,
                prune_schema,
                limit,
                max_tokens,
            };
            let summary = cmd_bench(&config, options).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_bench_summary(&summary);
            }
        }

        Commands::Clean {
            input,
            output,
            previous,
        } => {
            let options = CleanOptions {
                input,
                output,
                previous,
            };
            let stats = cmd_clean(&config, options)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_clean_stats(&stats);
            }
        }

        Commands::Prepare => {
            let stats = cmd_prepare(&config)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_prepare_stats(&stats);
            }
        }

        Commands::Validate => {
            let report = cmd_validate(&config).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_validation_report(&report);
            }
        }

        Commands::Status => {
            let report = cmd_status(&config);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_status(&report);
            }
        }
    }

    Ok(())
}
