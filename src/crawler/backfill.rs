//! Backfill-phase orchestrator
//!
//! Repeatedly pulls bounded batches of content-missing rows and fetches
//! each release's detail page to complete it.

use crate::crawler::content_page::parse_content_page;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::storage::Store;
use crate::Result;
use std::time::Duration;

/// Totals reported after a backfill run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Rows pulled and attempted
    pub rows_processed: u64,
    /// Rows whose content was set
    pub rows_updated: u64,
    /// Rows fetched successfully but with no extractable container
    pub rows_without_content: u64,
    /// Rows whose detail page could not be fetched
    pub fetch_failures: u64,
}

/// Orchestrator for the backfill phase
pub struct Backfill<'a> {
    fetcher: &'a Fetcher,
    batch_size: u32,
    row_delay: Duration,
}

impl<'a> Backfill<'a> {
    /// Creates a backfill orchestrator
    pub fn new(fetcher: &'a Fetcher, batch_size: u32, row_delay: Duration) -> Self {
        Self {
            fetcher,
            batch_size: batch_size.max(1),
            row_delay,
        }
    }

    /// Backfills content for rows still missing it, up to `cap` rows
    ///
    /// Selection is always by the missing-content predicate with a keyset
    /// cursor, never by offset: rows completed during the run do not shift
    /// what the next pull returns, and a row that failed this run is not
    /// pulled again until the next invocation (its content stays NULL, so
    /// re-selection picks it up then). The loop terminates when a pull
    /// returns empty or the optional cap is reached.
    pub async fn run<S: Store>(&self, store: &mut S, cap: Option<u64>) -> Result<BackfillSummary> {
        let mut summary = BackfillSummary::default();
        let mut cursor: i64 = 0;

        'outer: loop {
            let batch_size = match cap {
                Some(limit) => {
                    let remaining = limit.saturating_sub(summary.rows_processed);
                    if remaining == 0 {
                        break;
                    }
                    (u64::from(self.batch_size)).min(remaining) as u32
                }
                None => self.batch_size,
            };

            let batch = store.list_missing_content(batch_size, cursor)?;
            if batch.is_empty() {
                break;
            }
            tracing::debug!("Processing batch of {} rows", batch.len());

            for stub in batch {
                cursor = stub.id;
                summary.rows_processed += 1;

                match self.fetcher.fetch(&stub.url).await {
                    FetchOutcome::Success { body } => match parse_content_page(&body) {
                        Some(text) => {
                            if store.set_content(stub.id, &text)? {
                                summary.rows_updated += 1;
                                tracing::info!("Updated content for id {}", stub.id);
                            }
                        }
                        None => {
                            // Fetched but nothing extractable; row stays
                            // NULL and is eligible for a future run
                            summary.rows_without_content += 1;
                            tracing::warn!("No content container at {} (id {})", stub.url, stub.id);
                        }
                    },
                    FetchOutcome::Failure {
                        url,
                        attempts,
                        last_error,
                    } => {
                        summary.fetch_failures += 1;
                        tracing::warn!(
                            "Could not fetch {} (id {}) after {} attempts: {}",
                            url,
                            stub.id,
                            attempts,
                            last_error
                        );
                    }
                }

                if let Some(limit) = cap {
                    if summary.rows_processed >= limit {
                        tracing::info!("Row cap of {} reached, stopping cleanly", limit);
                        break 'outer;
                    }
                }

                tokio::time::sleep(self.row_delay).await;
            }
        }

        tracing::info!(
            "Backfill finished: {} rows processed, {} updated, {} without content, {} fetch failures",
            summary.rows_processed,
            summary.rows_updated,
            summary.rows_without_content,
            summary.fetch_failures
        );

        Ok(summary)
    }
}
