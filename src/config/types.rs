use serde::Deserialize;

/// Main configuration structure for Newsletter-Hunt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub harvest: HarvestConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Page fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Archive root; issue pages live at `{base-url}/emails/{id}`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Total attempts per page, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsletterhunt.com".to_string(),
            max_attempts: 3,
            retry_delay_ms: 0,
            timeout_secs: 30,
        }
    }
}

/// Batch harvesting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Maximum number of ids fetched at once
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// First id of the default range (inclusive)
    #[serde(rename = "default-low")]
    pub default_low: i64,

    /// End of the default range (exclusive)
    #[serde(rename = "default-high")]
    pub default_high: i64,

    /// Harvest new issues before rendering instead of using the cache only
    #[serde(rename = "fetch-new")]
    pub fetch_new: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 128,
            default_low: 1,
            default_high: 32300,
            fetch_new: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "newsletter-hunt".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the Parquet dataset cache
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Path to the rendered HTML report
    #[serde(rename = "report-path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: "./newsletter.parquet".to_string(),
            report_path: "./letters.html".to_string(),
        }
    }
}
