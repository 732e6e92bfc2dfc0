//! # fund_scrape
//!
//! A scraping pipeline that collects public fundraising-campaign pages,
//! extracts structured fields from the HTML, stores the results in a local
//! SQLite database, and exports the collection as CSV or JSON.
//!
//! ## Features
//!
//! - Scrapes campaign pages supplied manually (`--url`, `--urls-file`)
//! - Discovers campaign URLs from the platform's listing pages (`--discover`)
//! - Keeps one record per campaign URL; re-scraping replaces the old record
//! - Exports everything stored to CSV and/or JSON
//!
//! ## Usage
//!
//! ```sh
//! fund_scrape --discover 20 --csv-out campaigns.csv
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery** (optional): collect candidate campaign URLs from listing pages
//! 2. **Fetching**: download each campaign page (bounded fan-out)
//! 3. **Extraction**: parse title, description, amounts, and donations
//! 4. **Storage**: upsert records into SQLite keyed by source URL
//! 5. **Export**: flatten the stored collection to CSV/JSON

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use fund_scrape::cli::Cli;
use fund_scrape::fetch::Fetcher;
use fund_scrape::retry::RetryFetch;
use fund_scrape::store::Store;
use fund_scrape::{discover, outputs, pipeline, utils};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fund_scrape starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.db, ?args.csv_out, ?args.json_out, "Parsed CLI arguments");

    // ---- Open store ----
    let store = Store::open(&args.db).await?;

    // ---- Build fetcher ----
    let fetcher = Fetcher::new(Duration::from_secs(args.timeout))?;

    // ---- Collect URLs ----
    let mut urls: Vec<String> = args.urls.clone();
    if let Some(path) = &args.urls_file {
        let from_file = utils::read_url_lines(path).await?;
        info!(count = from_file.len(), path = %path, "Loaded URLs from file");
        urls.extend(from_file);
    }
    if let Some(limit) = args.discover {
        match discover::discover(&fetcher, &args.base_url, limit as usize).await {
            Ok(found) => {
                info!(count = found.len(), "Discovery complete");
                urls.extend(found);
            }
            Err(e) => {
                warn!(error = %e, "Discovery failed; continuing with manually supplied URLs");
            }
        }
    }
    let urls: Vec<String> = urls.into_iter().unique().collect();

    if urls.is_empty() && args.csv_out.is_none() && args.json_out.is_none() {
        error!("No campaign URLs to scrape and no export requested; nothing to do");
        return Err("no campaign URLs (use --url, --urls-file or --discover)".into());
    }

    // ---- Scrape ----
    if !urls.is_empty() {
        info!(count = urls.len(), "Scraping campaign pages");
        let summary = if args.retries > 0 {
            let retrying = RetryFetch::new(fetcher.clone(), args.retries, Duration::from_secs(1));
            pipeline::scrape_batch(&retrying, &store, &urls, args.concurrency).await
        } else {
            pipeline::scrape_batch(&fetcher, &store, &urls, args.concurrency).await
        };
        info!(
            scraped = summary.scraped,
            failed = summary.failed,
            "Scrape stage complete"
        );
    }

    // ---- Export ----
    if args.csv_out.is_some() || args.json_out.is_some() {
        let records = store.list_all().await?;
        info!(count = records.len(), "Loaded records for export");

        if let Some(path) = &args.csv_out {
            let bytes = outputs::csv::export_csv(&records)?;
            tokio::fs::write(path, &bytes).await?;
            info!(path = %path, bytes = bytes.len(), "Wrote CSV export");
        }
        if let Some(path) = &args.json_out {
            outputs::json::write_records(&records, path).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
