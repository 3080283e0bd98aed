//! Batch harvester - concurrent fetch and extract over an id range
//!
//! Every id is an isolated unit of work: a missing page, a page that does not
//! parse, or a fetch that keeps failing only costs that one id. Concurrency is
//! bounded by a semaphore so large ranges keep a predictable footprint.

use crate::config::Config;
use crate::harvest::extractor::RecordExtractor;
use crate::harvest::fetcher::{build_http_client, FetchOutcome, PageFetcher};
use crate::storage::{Dataset, NewsletterRecord};
use crate::Result;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Progress is logged every this many completed ids
const PROGRESS_INTERVAL: usize = 100;

/// Outcome of one harvest pass
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Newly harvested records, sorted by id
    pub records: Dataset,

    /// Ids that produced a record
    pub fetched: usize,

    /// Ids answered with HTTP 404
    pub absent: usize,

    /// Pages that were served but did not match the expected markup
    pub extract_failures: usize,

    /// Ids that still failed after the retry budget
    pub fetch_failures: usize,

    /// Ids skipped because they were already cached
    pub skipped: usize,
}

impl fmt::Display for HarvestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Harvest finished: {} new, {} absent, {} unparsable, {} failed, {} skipped",
            self.fetched, self.absent, self.extract_failures, self.fetch_failures, self.skipped
        )
    }
}

/// What happened to a single id
enum UnitResult {
    Record(NewsletterRecord),
    Absent,
    Unparsable,
    Failed,
}

/// Fetches and parses newsletter pages with bounded concurrency
pub struct Harvester {
    fetcher: PageFetcher,
    extractor: Arc<RecordExtractor>,
    max_concurrency: usize,
}

impl Harvester {
    /// Creates a harvester from its parts
    pub fn new(fetcher: PageFetcher, extractor: RecordExtractor, max_concurrency: usize) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Builds the HTTP client, fetcher and extractor described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.fetcher, &config.user_agent)?;
        let fetcher = PageFetcher::new(client, &config.fetcher);
        let extractor = RecordExtractor::new(&config.fetcher.base_url)?;
        Ok(Self::new(
            fetcher,
            extractor,
            config.harvest.max_concurrency as usize,
        ))
    }

    /// Fetches and extracts every id in `range` that is not in `exclude`
    ///
    /// Never fails as a whole; per-id failures are logged and counted in the
    /// returned report. The records are not merged with any prior dataset.
    pub async fn harvest(&self, range: Range<i64>, exclude: &HashSet<i64>) -> HarvestReport {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        let mut report = HarvestReport::default();

        tracing::info!(
            "Harvesting ids {}..{} with up to {} concurrent fetches",
            range.start,
            range.end,
            self.max_concurrency
        );

        for id in range {
            if exclude.contains(&id) {
                report.skipped += 1;
                continue;
            }

            // Acquire before spawning so at most `max_concurrency` tasks exist
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let fetcher = self.fetcher.clone();
            let extractor = Arc::clone(&self.extractor);

            tasks.spawn(async move {
                let result = process_id(&fetcher, &extractor, id).await;
                drop(permit);
                result
            });
        }

        let mut records = Vec::new();
        let mut completed = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(UnitResult::Record(record)) => {
                    report.fetched += 1;
                    records.push(record);
                }
                Ok(UnitResult::Absent) => report.absent += 1,
                Ok(UnitResult::Unparsable) => report.extract_failures += 1,
                Ok(UnitResult::Failed) => report.fetch_failures += 1,
                Err(e) => {
                    tracing::error!("Harvest task aborted: {}", e);
                    report.fetch_failures += 1;
                }
            }

            completed += 1;
            if completed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} ids processed, {} newsletters found",
                    completed,
                    records.len()
                );
            }
        }

        report.records = records.into_iter().collect();
        report
    }
}

/// Fetches and parses one id, logging anything that is not a record
async fn process_id(fetcher: &PageFetcher, extractor: &RecordExtractor, id: i64) -> UnitResult {
    let body = match fetcher.fetch(id).await {
        Ok(FetchOutcome::Page(body)) => body,
        Ok(FetchOutcome::Absent) => {
            tracing::debug!("No newsletter at id {}", id);
            return UnitResult::Absent;
        }
        Err(e) => {
            tracing::error!("Error at id {}: {}", e.id(), e);
            return UnitResult::Failed;
        }
    };

    match extractor.extract(id, &body) {
        Ok(record) => {
            tracing::trace!("Parsed id {}: {}", id, record.title);
            UnitResult::Record(record)
        }
        Err(e) => {
            tracing::warn!("Page markup changed or incomplete: {}", e);
            UnitResult::Unparsable
        }
    }
}
