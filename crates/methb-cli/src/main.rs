//! methb - batch driver for the methemoglobinemia case-report pipeline
//!
//! ## Usage
//!
//! ```bash
//! methb texts               # data dir → documents CSV
//! methb extract             # documents CSV → records CSV + manifest
//! methb validate            # records CSV → issues CSV + spot-check sample
//! methb stats --json        # cohort statistics
//! methb run                 # texts, extract, validate
//! ```

mod config;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use methb_core::corpus::{dedupe, load_directory, read_documents_csv, write_documents_csv};
use methb_core::export::{
    extract_corpus, read_records_csv, write_records_csv, ExtractionSummary, RunManifest,
};
use methb_core::validation::{spot_check_sample, write_issues_csv, Validator};
use methb_core::CohortStats;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::PipelineConfig;

// ============================================================================
// CLI Definition
// ============================================================================

/// Rule-based mining of methemoglobinemia case reports
#[derive(Parser)]
#[command(name = "methb")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/methb-miner/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load abstracts and PDFs, de-duplicate, write the documents CSV
    Texts,

    /// Extract case records from the documents CSV
    Extract,

    /// Check extracted records and draw a spot-check sample
    Validate,

    /// Print cohort statistics for the extracted records
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run texts, extract and validate in sequence
    Run,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = PipelineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Texts => collect_texts(&config),
        Commands::Extract => extract_records(&config),
        Commands::Validate => validate_records(&config),
        Commands::Stats { json } => print_stats(&config, json),
        Commands::Run => {
            collect_texts(&config)?;
            extract_records(&config)?;
            validate_records(&config)
        }
    }
}

// ============================================================================
// Stages
// ============================================================================

fn collect_texts(config: &PipelineConfig) -> Result<()> {
    let paths = &config.paths;
    let load = load_directory(&paths.data_dir)
        .with_context(|| format!("Cannot read data directory {}", paths.data_dir.display()))?;

    for failure in &load.failures {
        warn!(path = %failure.path.display(), reason = %failure.reason, "skipped file");
    }

    let deduped = dedupe(load.documents);
    if !deduped.dropped_ids.is_empty() {
        info!(dropped = ?deduped.dropped_ids, "removed duplicate documents");
    }

    fs::create_dir_all(&paths.processed_dir)
        .with_context(|| format!("Cannot create {}", paths.processed_dir.display()))?;
    let out = paths.documents_path();
    write_documents_csv(&out, &deduped.documents)
        .with_context(|| format!("Cannot write {}", out.display()))?;

    println!(
        "Wrote {} documents to {} ({} skipped, {} duplicates)",
        deduped.documents.len(),
        out.display(),
        load.failures.len(),
        deduped.dropped_ids.len()
    );
    Ok(())
}

fn extract_records(config: &PipelineConfig) -> Result<()> {
    let paths = &config.paths;
    let input = paths.documents_path();
    let documents = read_documents_csv(&input)
        .with_context(|| format!("Cannot read documents from {}", input.display()))?;

    let rows = extract_corpus(&documents);

    fs::create_dir_all(&paths.processed_dir)
        .with_context(|| format!("Cannot create {}", paths.processed_dir.display()))?;
    let output = paths.records_path();
    write_records_csv(&output, &rows)
        .with_context(|| format!("Cannot write {}", output.display()))?;

    let summary = ExtractionSummary::from_rows(&rows);
    let manifest = RunManifest::new(&input, &output, summary);
    manifest
        .write_json(paths.manifest_path())
        .context("Cannot write run manifest")?;

    println!("{}", manifest.summary);
    println!("Records written to {}", output.display());
    Ok(())
}

fn validate_records(config: &PipelineConfig) -> Result<()> {
    let paths = &config.paths;
    let input = paths.records_path();
    let rows = read_records_csv(&input)
        .with_context(|| format!("Cannot read records from {}", input.display()))?;

    let validator = Validator::new(config.validation.thresholds.clone());
    let report = validator.validate(&rows);
    println!("{report}");

    let issues_path = paths.issues_path();
    write_issues_csv(&issues_path, &report.issues)
        .with_context(|| format!("Cannot write {}", issues_path.display()))?;

    let sample = spot_check_sample(&rows, config.validation.spot_check_seed);
    let sample_path = paths.spot_check_path();
    write_records_csv(&sample_path, &sample)
        .with_context(|| format!("Cannot write {}", sample_path.display()))?;

    println!(
        "{} issues written to {}; {} records sampled to {}",
        report.issues.len(),
        issues_path.display(),
        sample.len(),
        sample_path.display()
    );
    Ok(())
}

fn print_stats(config: &PipelineConfig, json: bool) -> Result<()> {
    let input = config.paths.records_path();
    let rows = read_records_csv(&input)
        .with_context(|| format!("Cannot read records from {}", input.display()))?;

    let stats = CohortStats::from_rows(&rows);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats}");
    }
    Ok(())
}
