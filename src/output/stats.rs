//! Statistics over a cached dataset
//!
//! This module summarises what the cache holds, for the `--stats` mode.

use crate::storage::Dataset;
use std::collections::HashMap;

/// How many issues one sender has in the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderCount {
    pub name: String,
    pub source_url: String,
    pub count: usize,
}

/// Dataset statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStatistics {
    /// Number of cached newsletters
    pub total_records: usize,

    /// Number of distinct sender URLs
    pub distinct_senders: usize,

    /// Lowest and highest cached id
    pub min_id: Option<i64>,
    pub max_id: Option<i64>,

    /// Senders by descending issue count, ties broken by URL
    pub top_senders: Vec<SenderCount>,
}

impl DatasetStatistics {
    /// Computes statistics for `dataset`
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut senders: HashMap<&str, SenderCount> = HashMap::new();
        for record in dataset {
            senders
                .entry(record.source_url.as_str())
                .or_insert_with(|| SenderCount {
                    name: record.name.clone(),
                    source_url: record.source_url.clone(),
                    count: 0,
                })
                .count += 1;
        }

        let mut top_senders: Vec<SenderCount> = senders.into_values().collect();
        top_senders.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.source_url.cmp(&b.source_url))
        });

        Self {
            total_records: dataset.len(),
            distinct_senders: top_senders.len(),
            min_id: dataset.iter().map(|r| r.id).min(),
            max_id: dataset.iter().map(|r| r.id).max(),
            top_senders,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `top` - How many senders to list
pub fn print_statistics(stats: &DatasetStatistics, top: usize) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Cached newsletters: {}", stats.total_records);
    println!("  Distinct senders: {}", stats.distinct_senders);
    if let (Some(min), Some(max)) = (stats.min_id, stats.max_id) {
        println!("  Id span: {} - {}", min, max);
    }
    println!();

    if !stats.top_senders.is_empty() {
        println!("Top Senders:");
        for sender in stats.top_senders.iter().take(top) {
            let percentage = (sender.count as f64 / stats.total_records as f64) * 100.0;
            println!(
                "  {} ({}): {} ({:.1}%)",
                sender.name, sender.source_url, sender.count, percentage
            );
        }
        if stats.top_senders.len() > top {
            println!("  ... and {} more", stats.top_senders.len() - top);
        }
    }
}
