//! Core library for the fund_scrape campaign scraper.
//!
//! The pipeline stages live here so integration tests and other front-ends
//! can drive them directly: discover URLs, fetch pages, extract records,
//! persist them, export the collection. The binary in `main.rs` is a thin
//! CLI over these modules.

pub mod cli;
pub mod discover;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod retry;
pub mod store;
pub mod utils;

pub use error::{DiscoverError, ExportError, ExtractError, FetchError, ScrapeError, StoreError};
pub use fetch::{FetchPage, Fetcher};
pub use models::{Amount, CampaignRecord, Donation};
pub use pipeline::BatchSummary;
pub use retry::RetryFetch;
pub use store::Store;
