//! HTML report generation
//!
//! This module renders a dataset as a self-contained HTML table where the
//! title and sender columns are hyperlinks. Anchors are emitted as raw
//! markup; every other piece of text is entity-escaped, with non-ASCII
//! characters written as numeric character references.

use crate::harvest::page_url;
use crate::storage::Dataset;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the rendered report to `output_path`, replacing any previous one
pub fn write_report(output_path: &Path, html: &str) -> std::io::Result<()> {
    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;
    Ok(())
}

/// Formats a dataset as an HTML report
///
/// # Columns
///
/// | Column | Content |
/// |--------|---------|
/// | id | Row header, the newsletter id |
/// | title | Link to the issue page `{base_url}/emails/{id}` |
/// | name | Link to the sender page |
/// | date | Escaped publication date |
///
/// The sender URL only appears inside the name link.
pub fn format_report(dataset: &Dataset, base_url: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Newsletters</title>\n</head>\n<body>\n");

    html.push_str("<table border=\"1\" class=\"dataframe\">\n");
    html.push_str("  <thead>\n");
    html.push_str("    <tr style=\"text-align: right;\">\n");
    for header in ["id", "title", "name", "date"] {
        html.push_str(&format!("      <th>{}</th>\n", header));
    }
    html.push_str("    </tr>\n");
    html.push_str("  </thead>\n");

    html.push_str("  <tbody>\n");
    for record in dataset {
        // The issue link is keyed by the row's index label, the id
        let title = create_link(&page_url(base_url, record.id), &record.title);
        let name = create_link(&record.source_url, &record.name);

        html.push_str("    <tr>\n");
        html.push_str(&format!("      <th>{}</th>\n", record.id));
        html.push_str(&format!("      <td>{}</td>\n", title));
        html.push_str(&format!("      <td>{}</td>\n", name));
        html.push_str(&format!("      <td>{}</td>\n", escape_html(&record.date)));
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n");
    html.push_str("</table>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Builds an anchor to `url` whose text is the escaped `text`
///
/// # Example
///
/// ```
/// use newsletter_hunt::output::create_link;
///
/// assert_eq!(
///     create_link("https://example.com/a", "Q&A"),
///     r#"<a href="https://example.com/a" rel="noopener noreferrer" target="_blank">Q&amp;A</a>"#
/// );
/// ```
pub fn create_link(url: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" rel="noopener noreferrer" target="_blank">{}</a>"#,
        escape_html(url),
        escape_html(text)
    )
}

/// Escapes HTML special characters and every non-ASCII character
///
/// `& < > " '` become entities; anything outside ASCII becomes a decimal
/// character reference such as `&#8217;`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c if c.is_ascii() => escaped.push(c),
            c => escaped.push_str(&format!("&#{};", c as u32)),
        }
    }

    escaped
}
