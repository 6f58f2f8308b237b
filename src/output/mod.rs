//! Output formatters for wf-logstats analysis results

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::analytics::DensityPlot;
use crate::signature::SignatureType;
use crate::view::ViewPage;
use serde::Serialize;

/// Complete result of one analysis run: the plot descriptor plus the
/// requested page of the record table.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub plot: DensityPlot,
    pub page: ViewPage,
    /// Number of reconstructed records in scope before search filtering
    pub total_records: usize,
    /// Category the view was scoped to, if any
    pub selected_signature: Option<SignatureType>,
}
