//! CSV export of stored campaign records.
//!
//! One row per record. Donations are flattened into a single sub-field:
//! entries joined by `"; "`, each formatted `donor|amount|when`. Unknown
//! amounts render as the literal `unknown`, never `0`. Quoting follows
//! RFC 4180, handled by the `csv` writer.
//!
//! The export is deterministic: the same record slice always serializes to
//! byte-identical output.

use itertools::Itertools;

use crate::error::ExportError;
use crate::models::{CampaignRecord, Donation};

/// Column layout, in order.
pub const CSV_HEADER: [&str; 7] = [
    "source_url",
    "title",
    "description",
    "amount_raised",
    "goal",
    "donations",
    "scraped_at",
];

/// Serialize records to CSV bytes.
pub fn export_csv(records: &[CampaignRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        let amount_raised = record.amount_raised.to_string();
        let goal = record.goal.to_string();
        let donations = flatten_donations(&record.donations);
        let scraped_at = record.scraped_at.to_rfc3339();
        writer.write_record([
            record.source_url.as_str(),
            record.title.as_str(),
            record.description.as_str(),
            amount_raised.as_str(),
            goal.as_str(),
            donations.as_str(),
            scraped_at.as_str(),
        ])?;
    }
    writer.flush().map_err(ExportError::Io)?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Flatten donations to `donor|amount|when` entries joined by `"; "`.
fn flatten_donations(donations: &[Donation]) -> String {
    donations
        .iter()
        .map(|d| format!("{}|{}|{}", d.donor_name, d.amount, d.when))
        .join("; ")
}
