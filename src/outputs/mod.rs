//! Export formats for stored campaign records.
//!
//! This module contains submodules responsible for serializing the record
//! collection for downstream consumers:
//!
//! # Submodules
//!
//! - [`csv`]: Flattens records to CSV bytes, one row per campaign
//! - [`json`]: Writes records as a pretty-printed JSON array file
//!
//! Both exports are deterministic for a given record list; the store hands
//! records over in a stable order, so re-exporting unchanged data produces
//! byte-identical output.

pub mod csv;
pub mod json;
