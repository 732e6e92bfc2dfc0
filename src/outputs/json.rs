//! JSON export of stored campaign records.
//!
//! Serializes the record collection as a pretty-printed JSON array, the
//! same shape API consumers get from a scrape: amounts appear as numbers
//! or `null`, donations as nested objects in page order.

use tokio::fs;
use tracing::{info, instrument};

use crate::error::ExportError;
use crate::models::CampaignRecord;

/// Write records to a JSON file at `path`.
///
/// # Arguments
///
/// * `records` - The records to serialize
/// * `path` - Destination file; overwritten if present
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization or the write fails.
#[instrument(level = "info", skip(records), fields(path = %path, count = records.len()))]
pub async fn write_records(records: &[CampaignRecord], path: &str) -> Result<(), ExportError> {
    let json = serde_json::to_vec_pretty(records)?;
    fs::write(path, json).await?;
    info!(path, "Wrote JSON export");
    Ok(())
}
