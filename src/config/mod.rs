//! Configuration module for Newsletter-Hunt
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file or a partial file is fine.
//!
//! # Example
//!
//! ```no_run
//! use newsletter_hunt::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hunt.toml")).unwrap();
//! println!("Harvest concurrency: {}", config.harvest.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, HarvestConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_range};
