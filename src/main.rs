//! web-spider main entry point
//!
//! This is the command-line interface for the web-spider link crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_spider::config::{load_config, validate, Config};
use web_spider::crawler::Coordinator;
use web_spider::output::{print_statistics, Reporter};
use web_spider::{is_valid, SpiderError};

/// web-spider: a concurrent link crawler
///
/// Starting from SEED_URL, fetches every reachable http(s) page once and
/// prints each crawled URL followed by the links found on it.
#[derive(Parser, Debug)]
#[command(name = "web-spider")]
#[command(version)]
#[command(about = "A concurrent link crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<u32>,

    /// How long an empty frontier is waited on before the crawl ends (milliseconds)
    #[arg(long, value_name = "MS")]
    frontier_timeout_ms: Option<u64>,

    /// Per-request fetch timeout (seconds)
    #[arg(long, value_name = "SECS")]
    fetch_timeout_secs: Option<u64>,

    /// Maximum number of hops from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Append crawl records to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Builds the effective configuration: file (or defaults), then flags
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(timeout) = self.frontier_timeout_ms {
            config.crawler.frontier_timeout_ms = timeout;
        }
        if let Some(timeout) = self.fetch_timeout_secs {
            config.crawler.fetch_timeout_secs = timeout;
        }
        if self.max_depth.is_some() {
            config.crawler.max_depth = self.max_depth;
        }
        if self.log_file.is_some() {
            config.output.log_path = self.log_file.clone();
        }

        validate(&config).context("Invalid command-line options")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let seed = cli.seed.trim().to_string();
    if !is_valid(&seed) {
        return Err(SpiderError::InvalidSeed { url: seed }.into());
    }

    let config = cli.resolve_config()?;

    let reporter = match &config.output.log_path {
        Some(path) => {
            tracing::info!("Writing crawl records to {}", path.display());
            Reporter::to_file(path)?
        }
        None => Reporter::stdout(),
    };

    // Records go to the reporter only
    let coordinator = Coordinator::new(config, reporter)?.discard_records();
    let summary = match coordinator.run(&seed).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        println!();
        print_statistics(&summary.statistics);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they never mix with records printed to stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_spider=info,warn"),
            1 => EnvFilter::new("web_spider=debug,info"),
            2 => EnvFilter::new("web_spider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
