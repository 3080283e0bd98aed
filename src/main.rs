//! Newsletter-Hunt main entry point
//!
//! This is the command-line interface for the Newsletter-Hunt harvester.

use anyhow::Context;
use clap::Parser;
use newsletter_hunt::config::{load_config_with_hash, validate_range, Config};
use newsletter_hunt::output::{print_statistics, DatasetStatistics};
use newsletter_hunt::storage::{DatasetStore, ParquetStore};
use newsletter_hunt::render_report;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Newsletter-Hunt: a newsletter archive harvester
///
/// Renders every cached issue of one sender as an HTML table. With --fetch,
/// the archive is harvested first and new issues are merged into the cache.
#[derive(Parser, Debug)]
#[command(name = "newsletter-hunt")]
#[command(version)]
#[command(about = "A newsletter archive harvester", long_about = None)]
struct Cli {
    /// Sender page URL whose issues go into the report
    #[arg(
        value_name = "SELECTION_URL",
        required_unless_present_any = ["dry_run", "stats"]
    )]
    selection_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First id to harvest (inclusive)
    #[arg(long, value_name = "ID")]
    from: Option<i64>,

    /// Last id to harvest (exclusive)
    #[arg(long, value_name = "ID")]
    to: Option<i64>,

    /// Harvest new newsletters before rendering
    #[arg(long)]
    fetch: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration without fetching or rendering
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the cached dataset and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if cli.fetch {
        config.harvest.fetch_new = true;
    }
    let low = cli.from.unwrap_or(config.harvest.default_low);
    let high = cli.to.unwrap_or(config.harvest.default_high);
    validate_range(low, high)?;

    if cli.dry_run {
        handle_dry_run(&config, low, high);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        let selection_url = cli
            .selection_url
            .context("a selection URL is required to render a report")?;
        handle_render(&config, &selection_url, low, high).await?;
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
            0 => EnvFilter::new("newsletter_hunt=info,warn"),
            1 => EnvFilter::new("newsletter_hunt=debug,info"),
            2 => EnvFilter::new("newsletter_hunt=trace,debug"),
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

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config, low: i64, high: i64) {
    println!("=== Newsletter-Hunt Dry Run ===\n");

    println!("Fetcher:");
    println!("  Base URL: {}", config.fetcher.base_url);
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!("  Retry delay: {}ms", config.fetcher.retry_delay_ms);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nHarvest:");
    println!("  Fetch new newsletters: {}", config.harvest.fetch_new);
    println!("  Id range: {}..{}", low, high);
    println!("  Max concurrency: {}", config.harvest.max_concurrency);

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics of the cached dataset
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Dataset: {}\n", config.output.dataset_path);

    let store = ParquetStore::new(Path::new(&config.output.dataset_path));
    match store.load()? {
        Some(dataset) => print_statistics(&DatasetStatistics::from_dataset(&dataset), 20),
        None => println!("No dataset has been harvested yet"),
    }

    Ok(())
}

/// Handles the main render operation
async fn handle_render(
    config: &Config,
    selection_url: &str,
    low: i64,
    high: i64,
) -> anyhow::Result<()> {
    if config.harvest.fetch_new {
        tracing::info!("Harvesting ids {}..{} before rendering", low, high);
    } else {
        tracing::info!("Rendering from cache only");
    }

    match render_report(config, selection_url, low..high).await {
        Ok(Some(summary)) => {
            println!(
                "✓ {} newsletters written to {}",
                summary.rows,
                summary.path.display()
            );
            Ok(())
        }
        Ok(None) => {
            println!("No cached newsletters yet; run with --fetch to harvest them");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Render failed: {}", e);
            Err(e.into())
        }
    }
}
