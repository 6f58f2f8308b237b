//! Typed rows of the CSV workflow log export

use crate::{parse_error, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// Columns the analysis consumes; the reader refuses files without them
const REQUIRED_COLUMNS: [&str; 4] = ["logType_id", "date", "username", "message"];

/// One raw row of the workflow log export.
///
/// Extra columns in the source file are ignored; the four columns below are
/// the ones the analysis consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRow {
    /// Numeric code identifying the event family
    #[serde(rename = "logType_id")]
    pub log_type_id: i64,
    /// Event timestamp, parsed downstream by the event extractor
    pub date: String,
    /// Account that produced the log row
    pub username: String,
    /// Free-text log message
    pub message: String,
}

/// Read all rows from a CSV log file.
///
/// A file missing one of the required columns is rejected outright; rows
/// that fail to deserialize individually (e.g. a non-numeric type code) are
/// skipped with a warning rather than failing the whole file.
pub fn read_log_rows(path: &Path) -> Result<Vec<LogRow>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(parse_error(
                &format!("Missing required column: {}", required),
                None,
                None,
            ));
        }
    }

    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<LogRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("Skipping row {} of {}: {}", index + 1, path.display(), e);
            }
        }
    }

    Ok(rows)
}
