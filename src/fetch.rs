//! HTTP fetching for campaign and listing pages.
//!
//! One [`Fetcher`] wraps a single `reqwest::Client` configured with a
//! browser-like user agent and a bounded per-request timeout. A fetch makes
//! exactly one outbound request: no retries happen at this layer. Callers
//! that want retries wrap the fetcher in [`crate::retry::RetryFetch`].

use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// User agent presented to the platform. Pages served to the default
/// library agent omit the progress meter and donation list entirely.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Something that can turn a URL into page HTML.
///
/// This is the seam between the pipeline and the network: [`Fetcher`] is the
/// real implementation, [`crate::retry::RetryFetch`] decorates any
/// implementation with backoff, and tests substitute fixture-backed stubs.
#[allow(async_fn_in_trait)]
pub trait FetchPage {
    /// Fetch one page and return the response body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher over a shared connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for Fetcher {
    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// * [`FetchError::InvalidUrl`] - the URL does not parse or is not http(s)
    /// * [`FetchError::Request`] - connection failure or timeout
    /// * [`FetchError::Status`] - the server answered with a non-2xx status
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), %url, "Fetched page");
        Ok(body)
    }
}
