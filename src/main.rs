//! Site-Ripple main entry point
//!
//! This is the command-line interface for the Site-Ripple crawler.

use anyhow::Context;
use clap::Parser;
use site_ripple::config::{load_config, validate, Config};
use site_ripple::crawler::Coordinator;
use site_ripple::output::{render_report, write_markdown_summary};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Ripple: a concurrent single-site crawler
///
/// Site-Ripple starts from a seed URL and follows every link that stays on
/// the seed's site, with a pool of concurrent workers, until no unexplored
/// links remain. It then lists every URL it crawled.
#[derive(Parser, Debug)]
#[command(name = "site-ripple")]
#[command(version)]
#[command(about = "A concurrent single-site crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(short = 'u', long = "url", value_name = "URL")]
    url: Option<String>,

    /// Number of concurrent workers
    #[arg(short = 'n', long = "workers", value_name = "N")]
    workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a markdown summary of the crawl to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// List links that were found but are outside the crawled site
    #[arg(long)]
    track_out_of_scope: bool,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let coordinator = Coordinator::new(&config).context("Failed to build HTTP client")?;

    // Ctrl-C stops the crawl; workers finish the page they hold
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            interrupt.cancel();
        }
    });

    let report = match coordinator.run_until_cancelled(cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("Crawl failed");
        }
    };

    if !cli.quiet {
        println!("Started:  {}", report.started_at.to_rfc3339());
        println!("Finished: {}", report.finished_at.to_rfc3339());
        println!();
        print!("{}", render_report(&report));
    }

    if let Some(path) = &cli.summary {
        write_markdown_summary(&report, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_ripple=info,warn"),
            1 => EnvFilter::new("site_ripple=debug,info"),
            2 => EnvFilter::new("site_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and validates the result
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.url {
        config.crawler.seed_url = url.clone();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if cli.track_out_of_scope {
        config.crawler.track_out_of_scope = true;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}
