//! Parsers for the workflow event log export

pub mod events;
pub mod rows;

pub use events::{EventExtractor, EventKind, EventSet, LogEvent};
pub use rows::{read_log_rows, LogRow};
