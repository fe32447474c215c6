//! PhishScan CLI
//!
//! Heuristic phishing-risk scoring for pasted messages.

mod batch;
mod config;
mod render;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use phishscan_core::{
    extract_links, fingerprint, Assessment, Report, NO_INPUT_REASON, SIGNALS,
};

use crate::batch::{parse_batch, run_batch};
use crate::config::ScanConfig;
use crate::render::render_assessment;

#[derive(Parser)]
#[command(name = "phishscan")]
#[command(author, version, about = "PhishScan: heuristic phishing-risk scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// Configuration file (TOML)
    #[arg(long, env = "PHISHSCAN_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single message
    Analyze {
        /// Message text (reads --file or stdin when omitted)
        text: Option<String>,

        /// Read the message from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print a JSON report instead of the text summary
        #[arg(long)]
        json: bool,

        /// List the links that were found
        #[arg(long)]
        show_links: bool,
    },

    /// Score JSON-lines input ({"id": ..., "text": ...} per line)
    Batch {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Messages analyzed at once (overrides the config file)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// List the registered signals and their weights
    Signals,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; stdout carries results, logs go to stderr
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = ScanConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            text,
            file,
            json,
            show_links,
        } => {
            let input = read_message(text, file)?;
            run_analyze(&input, &config, json, show_links)?;
        }
        Commands::Batch { input, concurrency } => {
            let concurrency = concurrency.unwrap_or(config.batch.concurrency);
            run_batch_file(&input, &config, concurrency).await?;
        }
        Commands::Signals => {
            list_signals();
        }
    }

    Ok(())
}

/// Message text from the argument, a file, or stdin
fn read_message(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read message file {}", path.display()));
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read message from stdin")?;
    Ok(buf)
}

fn run_analyze(input: &str, config: &ScanConfig, json: bool, show_links: bool) -> Result<()> {
    let scanner = config.scanner();
    let assessment = scanner.scan(input)?;
    let links = extract_links(input);

    match &assessment {
        Assessment::NoInput => info!("No input to analyze"),
        Assessment::Analyzed(result) => info!(
            "Analyzed message {}: score={} verdict={} hits={}",
            fingerprint(input),
            result.score,
            result.verdict,
            result.hits
        ),
    }

    if !json {
        print!(
            "{}",
            render_assessment(&assessment, &links, config.display.max_reasons, show_links)
        );
        return Ok(());
    }

    let output = match assessment {
        Assessment::NoInput => serde_json::json!({
            "status": "no_input",
            "score": 0,
            "reasons": [NO_INPUT_REASON],
        }),
        Assessment::Analyzed(result) => {
            let report = Report::builder(input, result).links(&links).build();
            serde_json::to_value(&report)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

async fn run_batch_file(path: &Path, config: &ScanConfig, concurrency: usize) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;

    let (messages, errors) = parse_batch(&content);
    for error in &errors {
        warn!("Skipping line {}: {}", error.line, error.message);
    }
    info!("Batch: {} messages, {} malformed lines", messages.len(), errors.len());

    let outcomes = run_batch(messages, config.scanner(), concurrency).await;
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    info!("Batch complete: {} results", outcomes.len());
    Ok(())
}

fn list_signals() {
    println!("{:<15} {:>6}  LABEL", "KEY", "WEIGHT");
    for def in SIGNALS {
        println!("{:<15} {:>6}  {}", def.key, def.weight, def.label);
    }
}
