//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building a reusable HTTP client
//! - Bounded-retry GET requests
//! - Terminal failures surfaced as data, never as panics or errors

use crate::config::FetchConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
///
/// A `Failure` is terminal for this call: the attempt budget is spent and
/// the caller decides what to do. It never crosses the fetcher's boundary
/// as an `Err`.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
    },

    /// All attempts exhausted
    Failure {
        /// The URL that failed
        url: String,
        /// Number of attempts made
        attempts: u32,
        /// Status code or transport error from the last attempt
        last_error: String,
    },
}

impl FetchOutcome {
    /// Whether this outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Builds the shared HTTP client
///
/// One client is reused across every request of a run, so connections are
/// pooled across pages of the same host.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("comunicati/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrying page fetcher
///
/// Wraps a shared `reqwest::Client` with the attempt budget and the fixed
/// inter-attempt delay from the fetch configuration.
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the fetch configuration
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Creates a fetcher around an existing client (for tests)
    pub fn with_client(client: Client, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Fetches a URL with bounded retries
    ///
    /// Success means a 2xx response with a readable body. Any other status
    /// code or transport error counts as one failed attempt; after
    /// `max_attempts` total attempts the last error is returned as a
    /// terminal `Failure`.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            tracing::debug!("Fetching {} (attempt {}/{})", url, attempt, self.max_attempts);

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        match response.text().await {
                            Ok(body) => return FetchOutcome::Success { body },
                            Err(e) => {
                                last_error = format!("Body read error: {}", e);
                            }
                        }
                    } else {
                        last_error = format!("HTTP {}", status.as_u16());
                    }
                }
                Err(e) => {
                    last_error = if e.is_timeout() {
                        "Request timeout".to_string()
                    } else if e.is_connect() {
                        "Connection error".to_string()
                    } else {
                        e.to_string()
                    };
                }
            }

            tracing::warn!(
                "Attempt {}/{} for {} failed: {}",
                attempt,
                self.max_attempts,
                url,
                last_error
            );

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        FetchOutcome::Failure {
            url: url.to_string(),
            attempts: self.max_attempts,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = FetchConfig::default();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_fetcher_clamps_zero_attempts() {
        let client = Client::new();
        let fetcher = Fetcher::with_client(client, 0, Duration::from_millis(0));
        assert_eq!(fetcher.max_attempts, 1);
    }

    // Retry-bound behavior against a live endpoint is covered by the
    // wiremock integration tests.
}
