//! Detail-page parser
//!
//! Extracts the free-text body of a single release page.

use scraper::{Html, Selector};

/// Parses a detail page into its visible body text
///
/// The body lives in the same `div.view-content` container the listing
/// pages use, interpreted here as a single detail view. Text tokens are
/// joined by single spaces with leading and trailing whitespace trimmed.
///
/// Returns None when the container is missing: the page was fetched but
/// has no extractable content, which is distinct from a fetch failure and
/// leaves the row eligible for a future retry run.
pub fn parse_content_page(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let container_sel = Selector::parse("div.view-content").ok()?;
    let container = document.select(&container_sel).next()?;

    let text = container
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    Some(text)
}
