//! Newsletter page parser
//!
//! This module turns the markup of one archived issue into a
//! [`NewsletterRecord`]. Three parts of the page are required:
//! - The sender anchor (sender name and sender page URL)
//! - The issue heading (title)
//! - The publication `<time>` element (date)

use crate::storage::NewsletterRecord;
use crate::{ConfigError, ExtractError};
use scraper::{ElementRef, Html, Selector};

const TITLE_SELECTOR: &str = "div.min-w-0>h2";
const DATE_SELECTOR: &str = "div.min-w-0>p>time";

/// Extracts newsletter records from archive pages
///
/// Selectors are compiled once; the extractor holds no other state and can be
/// shared between tasks.
#[derive(Debug)]
pub struct RecordExtractor {
    sender: Selector,
    title: Selector,
    date: Selector,
}

impl RecordExtractor {
    /// Compiles the page selectors for an archive rooted at `base_url`
    ///
    /// The sender anchor is the one whose `href` points at
    /// `{base_url}/newsletters/`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let sender = format!(
            r#"p>a[href^="{}/newsletters/"]"#,
            base_url.trim_end_matches('/')
        );

        Ok(Self {
            sender: compile(&sender)?,
            title: compile(TITLE_SELECTOR)?,
            date: compile(DATE_SELECTOR)?,
        })
    }

    /// Parses the page `body` published under `id`
    ///
    /// # Returns
    ///
    /// * `Ok(NewsletterRecord)` - All required fields were found
    /// * `Err(ExtractError)` - A required element is missing; names the field
    ///
    /// # Example
    ///
    /// ```
    /// use newsletter_hunt::harvest::RecordExtractor;
    ///
    /// let extractor = RecordExtractor::new("https://newsletterhunt.com").unwrap();
    /// let html = r#"<div class="min-w-0">
    ///   <h2> Money Stuff: Don't Squeeze the Shorts </h2>
    ///   <p><a href="https://newsletterhunt.com/newsletters/money-stuff">Money Stuff</a></p>
    ///   <p><time>January 28, 2021</time></p>
    /// </div>"#;
    /// let record = extractor.extract(17, html).unwrap();
    /// assert_eq!(record.title, "Money Stuff: Don't Squeeze the Shorts");
    /// assert_eq!(record.name, "Money Stuff");
    /// ```
    pub fn extract(&self, id: i64, body: &str) -> Result<NewsletterRecord, ExtractError> {
        let document = Html::parse_document(body);

        let sender = first(&document, &self.sender, id, "name")?;
        let source_url = sender
            .value()
            .attr("href")
            .map(str::to_string)
            .ok_or(ExtractError::MissingField { id, field: "name" })?;
        let name = trimmed_text(sender);

        let title = trimmed_text(first(&document, &self.title, id, "title")?);
        let date = trimmed_text(first(&document, &self.date, id, "date")?);

        Ok(NewsletterRecord {
            id,
            title,
            name,
            source_url,
            date,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{}: {:?}", selector, e)))
}

fn first<'a>(
    document: &'a Html,
    selector: &Selector,
    id: i64,
    field: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    document
        .select(selector)
        .next()
        .ok_or(ExtractError::MissingField { id, field })
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
