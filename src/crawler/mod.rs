//! Crawler module for page fetching and the two harvest phases
//!
//! This module contains the core pipeline:
//! - HTTP fetching with a bounded retry budget
//! - Listing-page and detail-page parsing
//! - The list-phase and backfill-phase orchestrators

mod backfill;
mod content_page;
mod fetcher;
mod list_crawl;
mod list_page;

pub use backfill::{Backfill, BackfillSummary};
pub use content_page::parse_content_page;
pub use fetcher::{build_http_client, FetchOutcome, Fetcher};
pub use list_crawl::{CrawlSummary, ListCrawler};
pub use list_page::{extract_release_id, parse_list_page};
