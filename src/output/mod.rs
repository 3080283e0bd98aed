//! Output module for reports and statistics
//!
//! This module handles:
//! - Rendering the filtered HTML report with hyperlinks
//! - Summarising the cached dataset

mod html;
pub mod stats;

pub use html::{create_link, escape_html, format_report, write_report};
pub use stats::{print_statistics, DatasetStatistics};

use std::path::PathBuf;

/// What a render run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Where the report was written
    pub path: PathBuf,

    /// Number of newsletters in the report
    pub rows: usize,
}
