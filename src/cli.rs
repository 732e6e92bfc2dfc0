//! Command-line interface definitions for fund_scrape.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Several options can be provided via environment variables as well as
//! command-line flags.

use clap::Parser;

use crate::discover::DEFAULT_BASE_URL;
use crate::fetch::DEFAULT_TIMEOUT_SECS;
use crate::pipeline::DEFAULT_CONCURRENCY;

/// Command-line arguments for the fund_scrape application.
///
/// URLs come from three combinable sources: repeated `--url` flags, a
/// `--urls-file` list, and `--discover`. Whatever URLs are collected get
/// scraped into the database; `--csv-out`/`--json-out` then export
/// everything stored, so an export-only run (no URLs at all) is also valid.
///
/// # Examples
///
/// ```sh
/// # Scrape two campaign pages and export everything stored
/// fund_scrape -u https://www.gofundme.com/f/one -u https://www.gofundme.com/f/two \
///     --csv-out campaigns.csv
///
/// # Auto-discover up to 20 campaigns
/// fund_scrape --discover 20
///
/// # Export only, no scraping
/// fund_scrape --csv-out campaigns.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Campaign page URL to scrape (repeatable)
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one campaign URL per line (# starts a comment)
    #[arg(long, value_name = "PATH")]
    pub urls_file: Option<String>,

    /// Discover up to N campaign URLs from the platform's listing pages
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub discover: Option<u32>,

    /// SQLite database path
    #[arg(long, env = "FUND_SCRAPE_DB", default_value = "campaigns.db")]
    pub db: String,

    /// Write all stored records to this CSV file after scraping
    #[arg(long, value_name = "PATH")]
    pub csv_out: Option<String>,

    /// Write all stored records to this JSON file after scraping
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<String>,

    /// Platform root used for discovery listing pages
    #[arg(long, env = "FUND_SCRAPE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of pages fetched in parallel
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Retry failed fetches up to N times with exponential backoff
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub retries: usize,
}
