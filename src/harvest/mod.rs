//! Harvest module for newsletter page fetching and parsing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry logic
//! - Record extraction from issue markup
//! - Bounded-concurrency batch harvesting over id ranges

mod extractor;
mod fetcher;
mod harvester;

pub use extractor::RecordExtractor;
pub use fetcher::{build_http_client, page_url, FetchOutcome, PageFetcher};
pub use harvester::{HarvestReport, Harvester};
