//! fraud-eda CLI - one-shot exploratory fraud analysis
//!
//! Loads the transaction and exchange-rate parquet files, prints the summary
//! and draws the charts in the terminal.
//!
//! ## Example Usage
//!
//! ```bash
//! # Default paths under ./data
//! fraud-eda
//!
//! # Explicit inputs, Russian labels
//! fraud-eda --transactions tx.parquet --exchange fx.parquet --locale ru
//!
//! # Machine-readable output
//! fraud-eda --json > report.json
//! ```

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use fraud_eda::config::AnalysisConfig;
use fraud_eda::engine::AnalysisEngine;
use fraud_eda::report::Renderer;
use fraud_eda::types::Locale;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

/// fraud-eda: exploratory analysis of fraudulent transactions
#[derive(Parser)]
#[command(name = "fraud-eda")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Exploratory fraud analysis over transaction parquet data", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transaction parquet file
    #[arg(long)]
    transactions: Option<PathBuf>,

    /// Exchange-rate parquet file (wide: date + one column per currency)
    #[arg(long)]
    exchange: Option<PathBuf>,

    /// Fraction of rows sampled for the amount histogram
    #[arg(long)]
    sample_fraction: Option<f64>,

    /// Seed for the histogram sample
    #[arg(long)]
    seed: Option<u64>,

    /// Number of IPs / devices listed
    #[arg(long)]
    top: Option<usize>,

    /// Histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Label language (en, ru)
    #[arg(long)]
    locale: Option<Locale>,

    /// Chart width in terminal columns
    #[arg(long)]
    width: Option<usize>,

    /// Print the report as JSON instead of drawing charts
    #[arg(long)]
    json: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fraud-eda").join("config.toml"))
}

/// Explicit file is fatal on error; the home-directory file is best effort
fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    if let Some(config_path) = path {
        return AnalysisConfig::load(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()));
    }

    if let Some(default_config) = default_config_path() {
        if default_config.exists() {
            match AnalysisConfig::load(&default_config) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!(
                    "Ignoring config {}: {}",
                    default_config.display(),
                    e
                ),
            }
        }
    }

    Ok(AnalysisConfig::default())
}

fn apply_overrides(mut config: AnalysisConfig, cli: &Cli) -> AnalysisConfig {
    if let Some(path) = &cli.transactions {
        config.transactions_path = path.clone();
    }
    if let Some(path) = &cli.exchange {
        config.exchange_path = path.clone();
    }
    if let Some(fraction) = cli.sample_fraction {
        config.sample_fraction = fraction;
    }
    if let Some(seed) = cli.seed {
        config.sample_seed = seed;
    }
    if let Some(top) = cli.top {
        config.top_n = top;
    }
    if let Some(bins) = cli.bins {
        config.histogram_bins = bins;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(width) = cli.width {
        config.chart_width = width;
    }
    config
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = apply_overrides(load_config(cli.config.as_deref())?, cli);
    let engine = AnalysisEngine::new(config).context("Invalid configuration")?;
    let config = engine.config();

    let started = Instant::now();
    let pb = spinner("Loading transactions and exchange rates");
    let table = engine.load();
    pb.finish_and_clear();
    let table = table.with_context(|| {
        format!(
            "Failed to prepare {} with {}",
            config.transactions_path.display(),
            config.exchange_path.display()
        )
    })?;
    log::info!(
        "Prepared {} rows in {:.2}s",
        table.len(),
        started.elapsed().as_secs_f64()
    );

    let report = engine.report(&table)?;
    drop(table);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        let renderer = Renderer::new(config.chart_width, config.locale);
        renderer.render(&report, &mut io::stdout().lock())?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
