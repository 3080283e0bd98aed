//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - Mapping newsletter ids to archive page URLs
//! - Retry logic for transient failures
//! - Classifying responses into page, absence, or error

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Longest body excerpt carried by a [`FetchError::Status`]
const BODY_SNIPPET_CHARS: usize = 512;

/// Result of a fetch that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive served the page
    Page(String),

    /// HTTP 404: no newsletter was ever published under this id
    Absent,
}

/// Builds the archive URL of one newsletter issue
///
/// # Example
///
/// ```
/// use newsletter_hunt::harvest::page_url;
///
/// assert_eq!(
///     page_url("https://newsletterhunt.com/", 42),
///     "https://newsletterhunt.com/emails/42"
/// );
/// ```
pub fn page_url(base_url: &str, id: i64) -> String {
    format!("{}/emails/{}", base_url.trim_end_matches('/'), id)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `fetcher` - Timeouts for the client
/// * `user_agent` - The user agent identification
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches newsletter pages by id
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// fetcher can be handed to every harvest task.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl PageFetcher {
    /// Creates a fetcher over an existing client
    pub fn new(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// The archive URL for `id`
    pub fn page_url(&self, id: i64) -> String {
        page_url(&self.base_url, id)
    }

    /// Fetches the page for `id`
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Immediate → Page |
    /// | HTTP 404 | Immediate → Absent |
    /// | Any other status | Retry until `max_attempts` is spent → `FetchError::Status` |
    /// | Transport error | Retry until `max_attempts` is spent → `FetchError::Transport` |
    ///
    /// Other 2xx codes such as 204 count as failures.
    /// The same request is re-issued on each attempt, after `retry_delay`.
    pub async fn fetch(&self, id: i64) -> Result<FetchOutcome, FetchError> {
        let url = self.page_url(id);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::NOT_FOUND {
                        return Ok(FetchOutcome::Absent);
                    }

                    if status == StatusCode::OK {
                        match response.text().await {
                            Ok(body) => return Ok(FetchOutcome::Page(body)),
                            Err(e) => FetchError::Transport {
                                id,
                                message: format!("Failed to read body: {}", e),
                            },
                        }
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        FetchError::Status {
                            id,
                            status: status.as_u16(),
                            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                            body: body.chars().take(BODY_SNIPPET_CHARS).collect(),
                        }
                    }
                }
                Err(e) => FetchError::Transport {
                    id,
                    message: describe_transport_error(&e),
                },
            };

            if attempt >= self.max_attempts {
                return Err(failure);
            }

            tracing::debug!(
                "Attempt {}/{} for {} failed: {}",
                attempt,
                self.max_attempts,
                url,
                failure
            );

            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
