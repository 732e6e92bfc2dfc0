//! Batch scraping: fetch, extract, and store campaign pages.
//!
//! Pages are fetched concurrently with a bounded fan-out. Each URL's
//! fetch-extract-upsert sequence is independent: a URL that fails is logged
//! and counted, never allowed to abort the rest of the batch. Writes for a
//! given URL serialize through the store.

use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument};

use crate::error::ScrapeError;
use crate::extract;
use crate::fetch::FetchPage;
use crate::models::CampaignRecord;
use crate::store::Store;

/// Pages fetched in parallel during a batch scrape.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Outcome counts for one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// URLs scraped and stored.
    pub scraped: usize,
    /// URLs that failed at any stage.
    pub failed: usize,
}

/// Scrape a single campaign page into a record.
///
/// # Errors
///
/// Fetch and extraction failures propagate per URL; see [`ScrapeError`].
#[instrument(level = "debug", skip(fetcher))]
pub async fn scrape_one<F: FetchPage>(
    fetcher: &F,
    url: &str,
) -> Result<CampaignRecord, ScrapeError> {
    let html = fetcher.fetch(url).await?;
    let record = extract::extract(url, &html)?;
    Ok(record)
}

/// Scrape a batch of campaign URLs into the store.
///
/// Fetches run `concurrency` at a time. Failed URLs are logged and skipped
/// without failing the batch.
#[instrument(level = "info", skip_all, fields(urls = urls.len(), concurrency))]
pub async fn scrape_batch<F: FetchPage + Sync>(
    fetcher: &F,
    store: &Store,
    urls: &[String],
    concurrency: usize,
) -> BatchSummary {
    let outcomes: Vec<bool> = stream::iter(urls)
        .map(|url| async move {
            match scrape_one(fetcher, url).await {
                Ok(record) => match store.upsert(&record).await {
                    Ok(()) => {
                        info!(%url, title = %record.title, "Stored campaign");
                        true
                    }
                    Err(e) => {
                        error!(%url, error = %e, "Failed to store campaign");
                        false
                    }
                },
                Err(e) => {
                    error!(%url, error = %e, "Scrape failed; skipping URL");
                    false
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let scraped = outcomes.iter().filter(|ok| **ok).count();
    let summary = BatchSummary {
        scraped,
        failed: outcomes.len() - scraped,
    };
    info!(
        scraped = summary.scraped,
        failed = summary.failed,
        "Batch complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::Amount;
    use std::collections::HashMap;

    struct FixtureFetch {
        pages: HashMap<String, String>,
    }

    impl FetchPage for FixtureFetch {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
        }
    }

    fn campaign_page(title: &str, raised: &str) -> String {
        format!(
            r#"<html><body>
<h1 class="p-campaign-title">{title}</h1>
<div class="progress-meter_progressMeterHeading__A6Slt">
  <div class="progress-meter_largeType__L_4O8">{raised}</div>
  <span class="hrt-text-body-sm hrt-text-gray">raised of $20,000 goal</span>
</div>
</body></html>"#
        )
    }

    #[tokio::test]
    async fn test_scrape_one_builds_record() {
        let fetcher = FixtureFetch {
            pages: HashMap::from([(
                "https://example.com/f/library".to_string(),
                campaign_page("Save the Library", "$1,500"),
            )]),
        };

        let record = scrape_one(&fetcher, "https://example.com/f/library")
            .await
            .unwrap();
        assert_eq!(record.source_url, "https://example.com/f/library");
        assert_eq!(record.title, "Save the Library");
        assert_eq!(record.amount_raised, Amount::Known(1500.0));
        assert_eq!(record.goal, Amount::Known(20000.0));
    }

    #[tokio::test]
    async fn test_one_failing_url_does_not_abort_batch() {
        let fetcher = FixtureFetch {
            pages: HashMap::from([
                (
                    "https://example.com/f/one".to_string(),
                    campaign_page("One", "$100"),
                ),
                (
                    "https://example.com/f/three".to_string(),
                    campaign_page("Three", "$300"),
                ),
            ]),
        };
        let store = Store::in_memory().await.unwrap();
        let urls: Vec<String> = [
            "https://example.com/f/one",
            "https://example.com/f/two",
            "https://example.com/f/three",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let summary = scrape_batch(&fetcher, &store, &urls, 2).await;
        assert_eq!(summary, BatchSummary { scraped: 2, failed: 1 });

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(store.get("https://example.com/f/two").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rescrape_updates_in_place() {
        let store = Store::in_memory().await.unwrap();
        let url = "https://example.com/f/one".to_string();

        let fetcher = FixtureFetch {
            pages: HashMap::from([(url.clone(), campaign_page("One", "$100"))]),
        };
        scrape_batch(&fetcher, &store, std::slice::from_ref(&url), 1).await;

        let fetcher = FixtureFetch {
            pages: HashMap::from([(url.clone(), campaign_page("One", "$450"))]),
        };
        scrape_batch(&fetcher, &store, std::slice::from_ref(&url), 1).await;

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount_raised, Amount::Known(450.0));
    }
}
