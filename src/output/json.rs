//! JSON output formatter for wf-logstats results

use crate::analytics::DensityPlot;
use crate::output::AnalysisReport;
use crate::view::ViewPage;
use crate::Result;
use serde_json::json;

/// JSON formatter for analysis results
pub struct JsonFormatter {
    pretty: bool,
    metadata: Option<Metadata>,
}

struct Metadata {
    version: String,
    files: Vec<String>,
    total_rows: usize,
}

impl JsonFormatter {
    /// Create a new JSON formatter (compact output, no metadata)
    pub fn new() -> Self {
        Self {
            pretty: false,
            metadata: None,
        }
    }

    /// Enable or disable pretty-printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Attach run metadata (tool version, input files, raw row count)
    pub fn with_metadata(mut self, version: &str, files: Vec<String>, total_rows: usize) -> Self {
        self.metadata = Some(Metadata {
            version: version.to_string(),
            files,
            total_rows,
        });
        self
    }

    /// Format a full analysis report as JSON
    pub fn format(&self, report: &AnalysisReport) -> Result<String> {
        let mut value = json!({
            "plot": &report.plot,
            "view": &report.page,
            "total_records": report.total_records,
            "selected_signature": report.selected_signature,
        });

        if let Some(metadata) = &self.metadata {
            value["metadata"] = json!({
                "version": metadata.version,
                "files": metadata.files,
                "total_rows": metadata.total_rows,
            });
        }

        self.serialize(&value)
    }

    /// Format just the plot descriptor as JSON
    pub fn format_plot(&self, plot: &DensityPlot) -> Result<String> {
        self.serialize(&json!(plot))
    }

    /// Format just a view page as JSON
    pub fn format_page(&self, page: &ViewPage) -> Result<String> {
        self.serialize(&json!(page))
    }

    fn serialize(&self, value: &serde_json::Value) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(output)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
