//! Listing-page parser
//!
//! Extracts press-release stubs (id, url, title, date) from one paginated
//! listing page. Parsing is pure: no I/O, no mutation, order-preserving
//! with respect to the markup.

use crate::storage::DiscoveredRelease;
use chrono::NaiveDateTime;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Upstream timestamp format on listing pages
const UPSTREAM_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn release_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/comunicato/(\d+)").expect("valid release id pattern"))
}

/// Extracts the external release id from a detail-page URL
///
/// Matches the `/comunicato/<digits>` path segment. Returns None for URLs
/// that do not carry an id; such entries cannot be deduplicated and are
/// dropped by the list parser.
pub fn extract_release_id(url: &str) -> Option<i64> {
    release_id_re()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Parses one listing page into discovered release stubs
///
/// The release list lives in a single `div.view-content` container, one
/// `li.views-row` per release. A missing container yields an empty vec,
/// not an error: pages past the end of the listing are expected to be
/// empty.
///
/// Per entry:
/// - the title and relative link come from `span.views-field-field-titolo a`,
///   with the link resolved against `base_url`
/// - the timestamp comes from the `datetime` attribute under
///   `span.views-field-field-data-comunicato`, reformatted to `YYYY-MM-DD`,
///   kept raw when it does not parse, and None when absent
/// - entries whose resolved URL lacks the `/comunicato/<digits>` segment
///   are dropped
pub fn parse_list_page(html: &str, base_url: &Url) -> Vec<DiscoveredRelease> {
    let document = Html::parse_document(html);

    let container_sel = match Selector::parse("div.view-content") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    let container = match document.select(&container_sel).next() {
        Some(c) => c,
        None => return Vec::new(),
    };

    let row_sel = Selector::parse("li.views-row");
    let title_sel = Selector::parse("span.views-field-field-titolo a");
    let time_sel = Selector::parse("span.views-field-field-data-comunicato time[datetime]");
    let (row_sel, title_sel, time_sel) = match (row_sel, title_sel, time_sel) {
        (Ok(r), Ok(t), Ok(d)) => (r, t, d),
        _ => return Vec::new(),
    };

    let mut releases = Vec::new();

    for row in container.select(&row_sel) {
        let link = match row.select(&title_sel).next() {
            Some(l) => l,
            None => continue,
        };
        let href = match link.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let url = match base_url.join(href) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };

        // No id, no row: the store is keyed by the external id
        let id = match extract_release_id(&url) {
            Some(id) => id,
            None => continue,
        };

        let title = link.text().collect::<String>().trim().to_string();

        let date = row
            .select(&time_sel)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .map(reformat_timestamp);

        releases.push(DiscoveredRelease {
            id,
            url,
            title,
            date,
        });
    }

    releases
}

/// Reformats an upstream `YYYY-MM-DDTHH:MM:SSZ` timestamp to `YYYY-MM-DD`
///
/// Keeps the raw string when it does not match the expected format.
fn reformat_timestamp(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, UPSTREAM_TIMESTAMP_FORMAT) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://press.example.it/").unwrap()
    }

    fn list_entry(datetime: &str, href: &str, title: &str) -> String {
        format!(
            r#"<li class="views-row">
                <span class="views-field-field-data-comunicato">
                    <time datetime="{}">{}</time>
                </span>
                <span class="views-field-field-titolo">
                    <a href="{}">{}</a>
                </span>
            </li>"#,
            datetime, datetime, href, title
        )
    }

    fn list_page(entries: &[String]) -> String {
        format!(
            r#"<html><body><div class="view-content"><ul>{}</ul></div></body></html>"#,
            entries.join("\n")
        )
    }

    #[test]
    fn test_extract_release_id() {
        assert_eq!(
            extract_release_id("https://x/comunicato/12345"),
            Some(12345)
        );
        assert_eq!(extract_release_id("https://x/other/12345"), None);
    }

    #[test]
    fn test_extract_release_id_embedded() {
        assert_eq!(
            extract_release_id("https://press.example.it/home/comunicato/42?ref=rss"),
            Some(42)
        );
    }

    #[test]
    fn test_parse_two_entries() {
        let html = list_page(&[
            list_entry("2024-01-01T10:30:00Z", "/home/comunicato/100", "A"),
            list_entry("not-a-timestamp", "/home/comunicato/101", "B"),
        ]);
        let releases = parse_list_page(&html, &base_url());

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].id, 100);
        assert_eq!(releases[0].title, "A");
        assert_eq!(releases[0].date.as_deref(), Some("2024-01-01"));
        assert_eq!(
            releases[0].url,
            "https://press.example.it/home/comunicato/100"
        );

        // Malformed timestamps are kept as the raw string
        assert_eq!(releases[1].id, 101);
        assert_eq!(releases[1].date.as_deref(), Some("not-a-timestamp"));
    }

    #[test]
    fn test_missing_container_yields_empty() {
        let html = r#"<html><body><p>Nothing here</p></body></html>"#;
        assert!(parse_list_page(html, &base_url()).is_empty());
    }

    #[test]
    fn test_entry_without_id_is_dropped() {
        let html = list_page(&[
            list_entry("2024-01-01T10:30:00Z", "/home/comunicato/100", "A"),
            list_entry("2024-01-02T10:30:00Z", "/home/notizia/200", "B"),
        ]);
        let releases = parse_list_page(&html, &base_url());

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].id, 100);
    }

    #[test]
    fn test_entry_without_timestamp() {
        let html = list_page(&[r#"<li class="views-row">
                <span class="views-field-field-titolo">
                    <a href="/home/comunicato/100">No date</a>
                </span>
            </li>"#
            .to_string()]);
        let releases = parse_list_page(&html, &base_url());

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].date, None);
    }

    #[test]
    fn test_markup_order_preserved() {
        let html = list_page(&[
            list_entry("2024-01-03T00:00:00Z", "/home/comunicato/300", "C"),
            list_entry("2024-01-01T00:00:00Z", "/home/comunicato/100", "A"),
            list_entry("2024-01-02T00:00:00Z", "/home/comunicato/200", "B"),
        ]);
        let ids: Vec<i64> = parse_list_page(&html, &base_url())
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![300, 100, 200]);
    }
}
