//! Output formatting and persistence for dashboard snapshots.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::summary::DashboardSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a snapshot using Rust's debug pretty-print format.
pub fn print_pretty(summary: &DashboardSummary) {
    debug!("{:#?}", summary);
}

/// Logs a snapshot as pretty-printed JSON.
pub fn print_json(summary: &DashboardSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Appends a [`DashboardSummary`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, summary: &DashboardSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}
