//! Event extraction from raw workflow log rows

use crate::{timestamp_error, LogRow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use regex::Regex;

/// `logType_id` of process-started rows
pub const LOG_TYPE_STARTED: i64 = 9;
/// `logType_id` of signature-recorded rows
pub const LOG_TYPE_SIGNATURE: i64 = 8;
/// `logType_id` of process-completed rows
pub const LOG_TYPE_COMPLETED: i64 = 11;

/// Kind of a typed log event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Started,
    SignatureRecorded,
    Completed,
}

/// One typed event extracted from a raw log row. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub message: String,
    /// Process identifier, when the message carried one
    pub process_id: Option<String>,
    /// Signer token, set only on `SignatureRecorded` events
    pub signer: Option<String>,
}

/// The typed events of one analysis window, grouped by kind
#[derive(Debug, Default)]
pub struct EventSet {
    pub started: Vec<LogEvent>,
    pub signatures: Vec<LogEvent>,
    pub completed: Vec<LogEvent>,
}

impl EventSet {
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.signatures.is_empty() && self.completed.is_empty()
    }
}

/// Extractor turning raw rows into typed events by matching the structured
/// substrings the workflow engine embeds in its free-text messages.
pub struct EventExtractor {
    completed_regex: Regex,
    started_regex: Regex,
    signature_regex: Regex,
    signer_regex: Regex,
}

impl EventExtractor {
    /// Create a new extractor with the fixed message patterns compiled
    pub fn new() -> Self {
        Self {
            completed_regex: Regex::new(
                r"The process with id: (\d+) and tenant domain: \w+-\d+ has been completed",
            )
            .unwrap(),
            started_regex: Regex::new(r"workflow-id: (\d+)").unwrap(),
            signature_regex: Regex::new(r"Process id: (\d+)").unwrap(),
            // The engine sometimes doubles the interior space
            signer_regex: Regex::new(r"sign\s+by (\w+)").unwrap(),
        }
    }

    /// Extract all typed events from the raw rows.
    ///
    /// Rows with an unrecognized type code, an unparseable timestamp, or a
    /// Completed message that does not match the expected phrase are skipped;
    /// no error is surfaced.
    pub fn extract(&self, rows: &[LogRow]) -> EventSet {
        let mut events = EventSet::default();

        for row in rows {
            let kind = match row.log_type_id {
                LOG_TYPE_STARTED => EventKind::Started,
                LOG_TYPE_SIGNATURE => EventKind::SignatureRecorded,
                LOG_TYPE_COMPLETED => EventKind::Completed,
                _ => continue,
            };

            let timestamp = match self.parse_timestamp(&row.date) {
                Ok(ts) => ts,
                Err(e) => {
                    debug!("Skipping row with bad timestamp: {}", e);
                    continue;
                }
            };

            match kind {
                EventKind::Completed => {
                    // A completed row without the expected phrase yields nothing
                    let Some(captures) = self.completed_regex.captures(&row.message) else {
                        debug!("Completed row without process id: {}", row.message);
                        continue;
                    };
                    let process_id = captures.get(1).map(|m| m.as_str().to_string());
                    events.completed.push(LogEvent {
                        kind,
                        timestamp,
                        username: row.username.clone(),
                        message: row.message.clone(),
                        process_id,
                        signer: None,
                    });
                }
                EventKind::Started => {
                    let process_id = self
                        .started_regex
                        .captures(&row.message)
                        .and_then(|c| c.get(1))
                        .map(|m| m.as_str().to_string());
                    events.started.push(LogEvent {
                        kind,
                        timestamp,
                        username: row.username.clone(),
                        message: row.message.clone(),
                        process_id,
                        signer: None,
                    });
                }
                EventKind::SignatureRecorded => {
                    let process_id = self
                        .signature_regex
                        .captures(&row.message)
                        .and_then(|c| c.get(1))
                        .map(|m| m.as_str().to_string());
                    let signer = self
                        .signer_regex
                        .captures(&row.message)
                        .and_then(|c| c.get(1))
                        .map(|m| m.as_str().to_string());
                    events.signatures.push(LogEvent {
                        kind,
                        timestamp,
                        username: row.username.clone(),
                        message: row.message.clone(),
                        process_id,
                        signer,
                    });
                }
            }
        }

        events
    }

    /// Parse a timestamp string into `DateTime<Utc>`
    pub fn parse_timestamp(&self, value: &str) -> Result<DateTime<Utc>> {
        // RFC 3339 with an explicit offset
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.with_timezone(&Utc));
        }

        // Naive timestamps, UTC assumed
        let naive_formats = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];
        for format in naive_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(dt.and_utc());
            }
        }

        Err(timestamp_error("Failed to parse timestamp", value))
    }
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new()
    }
}
