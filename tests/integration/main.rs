//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the newsletter archive and test
//! the fetch, harvest, cache and render cycle end-to-end.

mod render_tests;

use newsletter_hunt::config::Config;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock archive
pub fn create_test_config(base_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.fetcher.base_url = base_url.to_string();
    config.fetcher.timeout_secs = 5;
    config.harvest.max_concurrency = 4;
    config.output.dataset_path = dir.join("newsletter.parquet").display().to_string();
    config.output.report_path = dir.join("letters.html").display().to_string();
    config
}

/// Markup of one archived issue, shaped like the real archive
pub fn newsletter_page(
    base_url: &str,
    sender_slug: &str,
    sender: &str,
    title: &str,
    date: &str,
) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <main>
          <div class="flex items-center">
            <div class="min-w-0">
              <h2 class="text-xl font-bold text-gray-500"> {title} </h2>
              <p class="text-sm"><a href="{base_url}/newsletters/{sender_slug}"> {sender} </a></p>
              <p class="text-sm text-gray-400"><time datetime="2021-01-28"> {date} </time></p>
            </div>
          </div>
          <article>Body of the letter</article>
        </main>
        </body></html>"#
    )
}

/// Serves `body` for `/emails/{id}`
pub async fn mount_page(server: &MockServer, id: i64, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/emails/{}", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}
