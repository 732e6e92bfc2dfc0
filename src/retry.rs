//! Bounded retry with exponential backoff for page fetches.
//!
//! The fetcher itself never retries (see [`crate::fetch`]); batching callers
//! opt in by wrapping any [`FetchPage`] implementation in [`RetryFetch`].
//! The CLI does this only when `--retries` is set.
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at the configured base delay
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//! - Permanently-invalid URLs are not retried

use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

use crate::error::FetchError;
use crate::fetch::FetchPage;

/// Decorator that adds exponential backoff retry logic to any [`FetchPage`]
/// implementation.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    /// The underlying fetcher to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    /// Create a new retry wrapper around an existing [`FetchPage`]
    /// implementation.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying fetcher to wrap
    /// * `max_retries` - Maximum number of retry attempts
    /// * `base_delay` - Initial delay between retries
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchPage for RetryFetch<T>
where
    T: FetchPage,
{
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch(url).await {
                Ok(body) => {
                    return Ok(body);
                }
                // A URL that does not parse will not parse on attempt two.
                Err(e @ FetchError::InvalidUrl { .. }) => {
                    return Err(e);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            %url,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        %url,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fails with a status error a fixed number of times, then succeeds.
    struct FlakyFetch {
        failures_left: Mutex<usize>,
        calls: Mutex<usize>,
    }

    impl FlakyFetch {
        fn new(failures: usize) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl FetchPage for FlakyFetch {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            *self.calls.lock().unwrap() += 1;
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(FetchError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    url: url.to_string(),
                });
            }
            Ok("<html></html>".to_string())
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let flaky = FlakyFetch::new(2);
        let retrying = RetryFetch::new(flaky, 3, StdDuration::from_millis(1));
        let body = retrying.fetch("https://example.com/f/x").await.unwrap();
        assert_eq!(body, "<html></html>");
        assert_eq!(retrying.inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let flaky = FlakyFetch::new(10);
        let retrying = RetryFetch::new(flaky, 2, StdDuration::from_millis(1));
        let err = retrying.fetch("https://example.com/f/x").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
        // initial attempt + 2 retries
        assert_eq!(retrying.inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_retried() {
        struct AlwaysInvalid;
        impl FetchPage for AlwaysInvalid {
            async fn fetch(&self, url: &str) -> Result<String, FetchError> {
                Err(FetchError::InvalidUrl {
                    url: url.to_string(),
                    reason: "unsupported scheme".to_string(),
                })
            }
        }

        let retrying = RetryFetch::new(AlwaysInvalid, 5, StdDuration::from_millis(1));
        let err = retrying.fetch("ftp://nope").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
