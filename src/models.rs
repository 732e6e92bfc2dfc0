//! Data models for scraped fundraising campaigns.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`CampaignRecord`]: one structured result of extracting a campaign page
//! - [`Donation`]: a single donation entry as shown on the page
//! - [`Amount`]: a money field that keeps "we could not read this" distinct
//!   from zero
//!
//! Records are created by the extractor, persisted by the store keyed on
//! `source_url`, and flattened by the exporters. They are never mutated
//! after persistence; a re-scrape of the same URL produces a full
//! replacement record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A money field scraped from a campaign page.
///
/// Pages render amounts as display strings ("$12,345"). The element can be
/// absent, or its text can fail to parse; both cases are [`Amount::Unknown`],
/// which stays distinct from zero all the way through storage and export.
///
/// # Serialization
///
/// `Known` serializes as a plain JSON number, `Unknown` as `null`, so JSON
/// consumers see `"goal": 20000.0` or `"goal": null` and never a sentinel
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Known(f64),
    Unknown,
}

impl Amount {
    /// The parsed value, if there is one.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Amount::Known(v) => Some(v),
            Amount::Unknown => None,
        }
    }

    /// Rebuild from a nullable column value.
    pub fn from_f64(value: Option<f64>) -> Self {
        match value {
            Some(v) => Amount::Known(v),
            None => Amount::Unknown,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Amount::Unknown)
    }
}

impl fmt::Display for Amount {
    /// Formats integral amounts without a fractional part and unknown
    /// amounts as the literal string `unknown`. This is the CSV rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Known(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Amount::Known(v) => write!(f, "{v}"),
            Amount::Unknown => write!(f, "unknown"),
        }
    }
}

/// One donation entry, in page order.
///
/// `when` is kept as the page shows it ("2 d", "5 hrs", an ISO date) rather
/// than parsed; the platform mixes relative and absolute forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    /// Donor name exactly as rendered. Empty when the page gives none;
    /// no placeholder is substituted.
    pub donor_name: String,
    /// Donated amount, `Unknown` when absent or unparseable.
    pub amount: Amount,
    /// Timestamp or relative-time text as shown on the page.
    pub when: String,
}

/// One scraped campaign page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// The campaign page URL. Uniquely identifies the record in the store
    /// and is never mutated after creation.
    pub source_url: String,
    /// Campaign title. Empty if not found on the page.
    pub title: String,
    /// Campaign narrative. Empty if not found.
    pub description: String,
    /// Running total raised so far.
    pub amount_raised: Amount,
    /// The fundraising goal.
    pub goal: Amount,
    /// Recent donations in page order, capped by the extractor.
    pub donations: Vec<Donation>,
    /// When this record was extracted.
    pub scraped_at: DateTime<Utc>,
}

impl CampaignRecord {
    /// The campaign slug from the source URL.
    /// For example: "https://www.gofundme.com/f/help-rebuild" -> "help-rebuild"
    pub fn slug(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.source_url).ok()?;
        let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
        if segments.next()? != "f" {
            return None;
        }
        segments.next().map(str::to_string)
    }
}
