//! Error types for each stage of the scraping pipeline.
//!
//! Each component gets its own error enum so callers can tell a network
//! failure from a page-structure failure from a persistence failure.
//! Per-URL errors ([`ScrapeError`]) are reported and skipped by batch
//! callers; they never abort the rest of a batch.

use thiserror::Error;

/// Failure to fetch a page over HTTP.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL did not parse, or is not http(s).
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request itself failed: connection refused, DNS, timeout.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status. No partial body is
    /// ever returned.
    #[error("unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// The document was too broken to build any record from.
///
/// Missing individual fields are not errors; they produce `unknown` values
/// on the record instead. See [`crate::extract`].
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("empty document")]
    EmptyDocument,
}

/// Failure to discover campaign URLs from the platform's listing pages.
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// `limit` must be at least 1. Values above the platform ceiling are
    /// capped, not rejected.
    #[error("discovery limit must be at least 1")]
    InvalidLimit,

    /// Every listing page failed to fetch. A subset failing is only a
    /// warning; discovery continues with the remaining pages.
    #[error("all listing pages failed to fetch")]
    AllListingsFailed,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Persistence failure. Fatal for the single read or upsert that hit it,
/// not for the process.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored donations column is not valid JSON: {0}")]
    Donations(#[from] serde_json::Error),

    #[error("stored timestamp is not valid RFC 3339: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Failure to serialize records for export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json write failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-URL composite error for the fetch-then-extract path.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
