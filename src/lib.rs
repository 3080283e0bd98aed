//! Newsletter-Hunt: a newsletter archive harvester
//!
//! This crate scrapes a sequentially numbered archive of email newsletters,
//! caches the parsed issues in a local Parquet file and renders a filtered
//! HTML report of the issues published by one sender.

pub mod config;
pub mod harvest;
pub mod output;
pub mod storage;

use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for Newsletter-Hunt operations
#[derive(Debug, Error)]
pub enum HuntError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Terminal failure of a page fetch once the retry budget is spent
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} {reason} for id {id}: {body}")]
    Status {
        id: i64,
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Transport error for id {id}: {message}")]
    Transport { id: i64, message: String },
}

impl FetchError {
    /// The newsletter id the failed request was for
    pub fn id(&self) -> i64 {
        match self {
            Self::Status { id, .. } | Self::Transport { id, .. } => *id,
        }
    }
}

/// A fetched page that does not match the expected markup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Missing field '{field}' on page {id}")]
    MissingField { id: i64, field: &'static str },
}

/// Result type alias for Newsletter-Hunt operations
pub type Result<T> = std::result::Result<T, HuntError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{FetchOutcome, HarvestReport, Harvester, PageFetcher, RecordExtractor};
pub use output::ReportSummary;
pub use storage::{Dataset, DatasetStore, NewsletterRecord, ParquetStore};

/// Loads the cached dataset, optionally harvests new issues, and writes the
/// HTML report for `selection_url`
///
/// Returns `Ok(None)` without touching the report file when there is no
/// dataset to render.
pub async fn render_report(
    config: &Config,
    selection_url: &str,
    range: Range<i64>,
) -> Result<Option<ReportSummary>> {
    let store = ParquetStore::new(Path::new(&config.output.dataset_path));
    let existing = store.load()?;
    tracing::info!(
        "Loaded {} cached newsletters from {}",
        existing.as_ref().map_or(0, Dataset::len),
        config.output.dataset_path
    );

    let letters = if config.harvest.fetch_new {
        let harvester = Harvester::from_config(config)?;
        let blacklist = existing.as_ref().map(Dataset::ids).unwrap_or_default();
        let report = harvester.harvest(range, &blacklist).await;
        tracing::info!("{}", report);
        storage::merge_and_save(&store, existing, report.records)?
    } else {
        existing
    };

    let Some(letters) = letters else {
        tracing::warn!("No newsletter dataset available, nothing to render");
        return Ok(None);
    };

    let selected = letters.filter_by_source(selection_url);
    let html = output::format_report(&selected, &config.fetcher.base_url);
    let path = PathBuf::from(&config.output.report_path);
    output::write_report(&path, &html)?;

    tracing::info!("Rendered {} newsletters to {}", selected.len(), path.display());
    Ok(Some(ReportSummary {
        path,
        rows: selected.len(),
    }))
}
