//! wf-logstats - workflow process log analysis tool
//!
//! This library reconstructs process lifecycles from workflow event logs,
//! classifies them by approval signature type and derives smoothed duration
//! distributions plus paginated tabular views.

pub mod analytics;
pub mod error;
pub mod output;
pub mod parsers;
pub mod signature;
pub mod view;

// Re-export commonly used items
pub use analytics::{
    format_duration, format_hour_tick, AxisUnit, DensityCurve, DensityEstimator, DensityPlot,
    LegendItem, MatchStrategy, ProcessReconstructor, ProcessRecord,
};
pub use error::{config_error, parse_error, timestamp_error, Result, WfLogstatsError};
pub use output::{AnalysisReport, JsonFormatter, TextFormatter};
pub use parsers::{read_log_rows, EventExtractor, EventKind, EventSet, LogEvent, LogRow};
pub use signature::{CategoryEntry, CategoryTable, SignatureType};
pub use view::{SortKey, SortOrder, ViewEngine, ViewPage, ViewQuery};
