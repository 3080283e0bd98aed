//! Parquet storage implementation
//!
//! This module provides a Parquet-file implementation of the DatasetStore
//! trait. The file holds one row group per save with the columns
//! `title, name, newsletter_url, date, id`.

use crate::storage::traits::{DatasetStore, StorageError, StorageResult};
use crate::storage::{Dataset, NewsletterRecord};
use arrow_array::{Array, ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Parquet file backend
#[derive(Debug, Clone)]
pub struct ParquetStore {
    path: PathBuf,
}

impl ParquetStore {
    /// Creates a store over `path`; the file need not exist yet
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetStore for ParquetStore {
    fn load(&self) -> StorageResult<Option<Dataset>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut records = Vec::new();
        for batch in reader {
            records.extend(from_record_batch(&batch?)?);
        }

        tracing::debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(Some(Dataset::from_records(records)))
    }

    fn save(&self, dataset: &Dataset) -> StorageResult<()> {
        let batch = to_record_batch(dataset)?;

        // Stage next to the target so the final rename stays on one filesystem
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;

        let mut writer = ArrowWriter::try_new(staged.as_file_mut(), batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        staged.as_file().sync_all()?;

        staged.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        tracing::debug!("Wrote {} records to {}", dataset.len(), self.path.display());
        Ok(())
    }
}

fn dataset_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("newsletter_url", DataType::Utf8, false),
        Field::new("date", DataType::Utf8, false),
        Field::new("id", DataType::Int64, false),
    ]))
}

fn to_record_batch(dataset: &Dataset) -> StorageResult<RecordBatch> {
    let batch = RecordBatch::try_new(
        dataset_schema(),
        vec![
            string_array(dataset.iter().map(|r| r.title.as_str())),
            string_array(dataset.iter().map(|r| r.name.as_str())),
            string_array(dataset.iter().map(|r| r.source_url.as_str())),
            string_array(dataset.iter().map(|r| r.date.as_str())),
            Arc::new(Int64Array::from_iter_values(dataset.iter().map(|r| r.id))),
        ],
    )?;

    Ok(batch)
}

fn string_array<'a>(values: impl Iterator<Item = &'a str>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

fn from_record_batch(batch: &RecordBatch) -> StorageResult<Vec<NewsletterRecord>> {
    let titles = string_column(batch, "title")?;
    let names = string_column(batch, "name")?;
    let urls = string_column(batch, "newsletter_url")?;
    let dates = string_column(batch, "date")?;
    let ids = batch
        .column_by_name("id")
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| StorageError::Schema("column 'id' missing or not Int64".to_string()))?;

    if ids.null_count() > 0 {
        return Err(StorageError::Schema("column 'id' contains nulls".to_string()));
    }

    Ok((0..batch.num_rows())
        .map(|row| NewsletterRecord {
            id: ids.value(row),
            title: titles.value(row).to_string(),
            name: names.value(row).to_string(),
            source_url: urls.value(row).to_string(),
            date: dates.value(row).to_string(),
        })
        .collect())
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> StorageResult<&'a StringArray> {
    let column = batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| StorageError::Schema(format!("column '{}' missing or not Utf8", name)))?;

    if column.null_count() > 0 {
        return Err(StorageError::Schema(format!("column '{}' contains nulls", name)));
    }

    Ok(column)
}
