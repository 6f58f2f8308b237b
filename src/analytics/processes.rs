//! Process lifecycle reconstruction from typed log events

use crate::parsers::{EventSet, LogEvent};
use crate::signature::SignatureType;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One reconstructed start-to-completion execution of a process.
///
/// A process id is not globally unique across runs; a Completed event paired
/// with several matching Started events yields one record per pair, sharing
/// the same end date, username and signature.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRecord {
    pub process_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// `(end_date - start_date)` in hours; negative if the log is inconsistent
    pub duration_hours: f64,
    /// Taken from the Completed event
    pub username: String,
    pub signature: Option<SignatureType>,
}

/// Policy for pairing a Completed event with its Started events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Match any Started event whose message contains the process id as a
    /// substring. Tolerates log formatting variance at the cost of false
    /// positives for ids that are prefixes of other ids.
    #[default]
    Substring,
    /// Match only Started events whose extracted workflow id equals the
    /// process id exactly.
    Exact,
}

/// Reconstructor joining Completed, Started and SignatureRecorded events
/// into [`ProcessRecord`]s.
pub struct ProcessReconstructor {
    strategy: MatchStrategy,
}

impl ProcessReconstructor {
    /// Create a reconstructor with the observed substring match policy
    pub fn new() -> Self {
        Self {
            strategy: MatchStrategy::Substring,
        }
    }

    /// Create a reconstructor with an explicit match policy
    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Reconstruct one record per (Completed event, matching Started event)
    /// pair. Completed events without any matching Started event contribute
    /// nothing.
    pub fn reconstruct(&self, events: &EventSet) -> Vec<ProcessRecord> {
        let mut records = Vec::new();

        for completed in &events.completed {
            let Some(process_id) = completed.process_id.as_deref() else {
                continue;
            };

            let signature = self.find_signature(events, process_id);

            for started in &events.started {
                if !self.matches_start(started, process_id) {
                    continue;
                }
                let duration_hours = (completed.timestamp - started.timestamp)
                    .num_milliseconds() as f64
                    / 3_600_000.0;
                records.push(ProcessRecord {
                    process_id: process_id.to_string(),
                    start_date: started.timestamp,
                    end_date: completed.timestamp,
                    duration_hours,
                    username: completed.username.clone(),
                    signature,
                });
            }
        }

        records
    }

    fn matches_start(&self, started: &LogEvent, process_id: &str) -> bool {
        match self.strategy {
            MatchStrategy::Substring => started
                .message
                .contains(&format!("workflow-id: {}", process_id)),
            MatchStrategy::Exact => started.process_id.as_deref() == Some(process_id),
        }
    }

    /// Signature of the first SignatureRecorded event naming this process id.
    /// Unknown signer tokens count as no signature.
    fn find_signature(&self, events: &EventSet, process_id: &str) -> Option<SignatureType> {
        let needle = format!("Process id: {}", process_id);
        events
            .signatures
            .iter()
            .find(|e| e.message.contains(&needle))
            .and_then(|e| e.signer.as_deref())
            .and_then(SignatureType::from_token)
    }
}

impl Default for ProcessReconstructor {
    fn default() -> Self {
        Self::new()
    }
}
