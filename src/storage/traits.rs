//! Storage traits and error types
//!
//! This module defines the trait interface for dataset backends and
//! associated error types.

use crate::storage::Dataset;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("Schema mismatch: {0}")]
    Schema(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for dataset persistence backends
///
/// A backend holds exactly one dataset and only ever replaces it whole.
pub trait DatasetStore {
    /// Loads the persisted dataset
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Dataset))` - A dataset was persisted by an earlier run
    /// * `Ok(None)` - Nothing has been persisted yet
    /// * `Err(StorageError)` - The dataset exists but could not be read
    fn load(&self) -> StorageResult<Option<Dataset>>;

    /// Replaces the persisted dataset with `dataset`
    ///
    /// Either the whole dataset is written or the previous one is left intact.
    fn save(&self, dataset: &Dataset) -> StorageResult<()>;
}
