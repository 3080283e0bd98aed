//! Storage module for persisting harvested newsletters
//!
//! This module handles the dataset cache, including:
//! - The record and dataset types
//! - Merging new records into the cached dataset with deduplication
//! - Parquet persistence with atomic replacement

mod dataset;
mod parquet_store;
mod traits;

pub use dataset::Dataset;
pub use parquet_store::ParquetStore;
pub use traits::{DatasetStore, StorageError, StorageResult};

/// One archived newsletter issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterRecord {
    /// Position of the issue in the archive; unique within a dataset
    pub id: i64,
    pub title: String,
    /// Sender display name
    pub name: String,
    /// Sender page URL, not the issue page
    pub source_url: String,
    /// Publication date as displayed by the archive
    pub date: String,
}

/// Merges `incoming` into `existing` and persists the result
///
/// When `incoming` is empty nothing is merged or written and `existing` is
/// returned as-is, including `None`. Otherwise the merged dataset replaces
/// the stored one in a single write and is returned.
///
/// # Returns
///
/// * `Ok(Some(Dataset))` - The merged (or unchanged) dataset
/// * `Ok(None)` - No prior dataset and nothing new
/// * `Err(StorageError)` - The merged dataset could not be written
pub fn merge_and_save<S: DatasetStore + ?Sized>(
    store: &S,
    existing: Option<Dataset>,
    incoming: Dataset,
) -> StorageResult<Option<Dataset>> {
    if incoming.is_empty() {
        tracing::debug!("No new newsletters, leaving the dataset untouched");
        return Ok(existing);
    }

    let incoming_len = incoming.len();
    let merged = match existing {
        Some(existing) => existing.merge(incoming),
        None => Dataset::default().merge(incoming),
    };

    store.save(&merged)?;
    tracing::info!(
        "Merged {} new newsletters, dataset now holds {}",
        incoming_len,
        merged.len()
    );

    Ok(Some(merged))
}
