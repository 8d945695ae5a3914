//! List-phase orchestrator
//!
//! Drives pagination across a page-number range, fetching each listing
//! page, parsing its release stubs, and persisting them one row at a time.

use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::list_page::parse_list_page;
use crate::storage::Store;
use crate::Result;
use std::time::Duration;
use url::Url;

/// Totals reported after a list-phase run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched and parsed
    pub pages_visited: u64,
    /// Pages given up on after the fetch attempt budget
    pub pages_failed: u64,
    /// Release stubs parsed across all pages
    pub records_parsed: u64,
    /// New rows actually inserted (duplicates absorbed by the store)
    pub rows_inserted: u64,
}

/// Orchestrator for the list phase
///
/// Strictly ordered by page number: later pages are only meaningful once
/// earlier ones are known to exist, so there is no concurrency here by
/// design.
pub struct ListCrawler<'a> {
    fetcher: &'a Fetcher,
    base_url: Url,
    page_delay: Duration,
}

impl<'a> ListCrawler<'a> {
    /// Creates a list crawler
    pub fn new(fetcher: &'a Fetcher, base_url: Url, page_delay: Duration) -> Self {
        Self {
            fetcher,
            base_url,
            page_delay,
        }
    }

    /// Crawls listing pages `start..=end` into the store
    ///
    /// Per page: fetch, parse, insert each stub individually so a crash
    /// mid-page keeps the rows committed so far. A terminal fetch failure
    /// on one page is logged and the crawl advances to the next page.
    /// Re-running the same range is idempotent: `insert_discovered`
    /// absorbs every duplicate.
    pub async fn run<S: Store>(&self, store: &mut S, start: u32, end: u32) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();
        let base = self.base_url.as_str().trim_end_matches('/');

        for page_num in start..=end {
            let page_url = format!("{}/?page={}", base, page_num);
            tracing::info!("Scraping page {} of {}", page_num, end);

            match self.fetcher.fetch(&page_url).await {
                FetchOutcome::Success { body } => {
                    let releases = parse_list_page(&body, &self.base_url);
                    summary.pages_visited += 1;
                    summary.records_parsed += releases.len() as u64;

                    let mut inserted = 0u64;
                    for release in &releases {
                        if store.insert_discovered(release)? {
                            inserted += 1;
                        }
                    }
                    summary.rows_inserted += inserted;

                    tracing::info!(
                        "Page {}: found {} releases, inserted {} new rows",
                        page_num,
                        releases.len(),
                        inserted
                    );
                }
                FetchOutcome::Failure {
                    url,
                    attempts,
                    last_error,
                } => {
                    // One bad page must not halt the whole crawl
                    summary.pages_failed += 1;
                    tracing::warn!(
                        "Giving up on {} after {} attempts: {}",
                        url,
                        attempts,
                        last_error
                    );
                }
            }

            if page_num < end {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        tracing::info!(
            "List crawl finished: {} pages visited, {} failed, {} records parsed, {} rows inserted",
            summary.pages_visited,
            summary.pages_failed,
            summary.records_parsed,
            summary.rows_inserted
        );

        Ok(summary)
    }
}
