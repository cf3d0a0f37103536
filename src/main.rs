//! Treescrape main entry point
//!
//! Command-line interface for the recursive structured web scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use treescrape::config::{load_config, ScrapeConfig};
use treescrape::engine::HttpEngine;
use treescrape::Scraper;

/// Treescrape: a recursive structured web scraper
///
/// Scrapes a seed URL, extracts text by CSS selectors, follows
/// same-domain links up to a bounded depth, and prints the result tree
/// as JSON.
#[derive(Parser, Debug)]
#[command(name = "treescrape")]
#[command(version)]
#[command(about = "Recursive structured web scraper", long_about = None)]
struct Cli {
    /// Seed URL to scrape
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the JSON result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first so the with-console flag can gate logging
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ScrapeConfig::default(),
    };

    if config.with_console || cli.verbose > 0 || cli.quiet {
        setup_logging(cli.verbose, cli.quiet);
    }

    tracing::info!("scraping {} to depth {}", cli.url, config.max_depth);

    let engine = HttpEngine::new().context("failed to build HTTP engine")?;
    let scraper = Scraper::from_config(engine, config)?;
    let result = scraper
        .scrape(&cli.url)
        .await
        .with_context(|| format!("scrape of {} failed", cli.url))?;

    let json = if cli.pretty {
        result.to_json_pretty()?
    } else {
        result.to_json()?
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("result written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("treescrape=info,warn"),
            1 => EnvFilter::new("treescrape=debug,info"),
            2 => EnvFilter::new("treescrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
