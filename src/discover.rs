//! Campaign-URL discovery from the platform's public listing pages.
//!
//! Discovery is a single pass over a fixed set of listing and category
//! pages. Every anchor on each page is resolved against the base URL and
//! kept when it points at a campaign page (`/f/<slug>` on the same host).
//! Results are deduplicated in first-seen order and capped at the requested
//! limit; the pass stops as soon as the limit is reached.
//!
//! One unreachable listing page is a warning, not a failure — discovery only
//! errors when every listing page fails.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::DiscoverError;
use crate::fetch::FetchPage;

/// Platform root the listing paths hang off.
pub const DEFAULT_BASE_URL: &str = "https://www.gofundme.com";

/// Listing and category pages checked for campaign links, in order.
pub const LISTING_PATHS: [&str; 4] = [
    "/discover",
    "/discover/trending",
    "/c/crisis-relief",
    "/c/medical",
];

/// Ceiling on a single discovery pass. Limits above this are capped, not
/// rejected.
pub const MAX_DISCOVER_URLS: usize = 100;

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Discover up to `limit` campaign URLs from the platform's listing pages.
///
/// # Arguments
///
/// * `fetcher` - The fetcher used for listing pages
/// * `base_url` - Platform root; listing paths are joined onto it
/// * `limit` - Maximum URLs to return, at least 1
///
/// # Errors
///
/// * [`DiscoverError::InvalidLimit`] - `limit` is zero
/// * [`DiscoverError::InvalidBaseUrl`] - `base_url` does not parse
/// * [`DiscoverError::AllListingsFailed`] - no listing page could be fetched
#[instrument(level = "info", skip(fetcher))]
pub async fn discover<F: FetchPage>(
    fetcher: &F,
    base_url: &str,
    limit: usize,
) -> Result<Vec<String>, DiscoverError> {
    if limit == 0 {
        return Err(DiscoverError::InvalidLimit);
    }
    let limit = limit.min(MAX_DISCOVER_URLS);
    let base = Url::parse(base_url)?;

    let mut seen = std::collections::HashSet::new();
    let mut urls = Vec::new();
    let mut failed_listings = 0usize;

    'listings: for path in LISTING_PATHS {
        let listing_url = base.join(path)?.to_string();
        match fetcher.fetch(&listing_url).await {
            Ok(html) => {
                let links = campaign_links(&html, &base);
                debug!(
                    count = links.len(),
                    listing = %listing_url,
                    "Listing page yielded campaign links"
                );
                for link in links {
                    if seen.insert(link.clone()) {
                        urls.push(link);
                        if urls.len() == limit {
                            break 'listings;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, listing = %listing_url, "Listing page fetch failed; continuing");
                failed_listings += 1;
            }
        }
    }

    if failed_listings == LISTING_PATHS.len() {
        return Err(DiscoverError::AllListingsFailed);
    }

    info!(count = urls.len(), limit, "Discovered campaign URLs");
    Ok(urls)
}

/// Extract campaign-page URLs from listing-page HTML, in document order.
/// Duplicates are kept; the caller deduplicates across pages.
pub fn campaign_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| campaign_url(href, base))
        .collect()
}

/// Resolve an href against the base and keep it only if it is a campaign
/// page: same host, path exactly `/f/<slug>`. Query strings, fragments,
/// and trailing slashes are stripped so the same campaign always yields
/// the same URL string.
fn campaign_url(href: &str, base: &Url) -> Option<String> {
    let mut resolved = base.join(href).ok()?;
    if resolved.host_str() != base.host_str() {
        return None;
    }
    let slug = {
        let segments: Vec<&str> = resolved.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["f", slug] => (*slug).to_string(),
            _ => return None,
        }
    };
    resolved.set_path(&format!("/f/{slug}"));
    resolved.set_query(None);
    resolved.set_fragment(None);
    Some(resolved.to_string())
}
