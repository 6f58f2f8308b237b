//! Human-readable text output formatter for wf-logstats results

use crate::analytics::DensityPlot;
use crate::error::fmt_error;
use crate::output::AnalysisReport;
use crate::view::ViewPage;
use crate::Result;
use std::fmt::Write;

/// Text formatter for analysis results
pub struct TextFormatter {
    // Configuration for text formatting
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self {}
    }

    /// Format a full analysis report as text
    pub fn format(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Workflow Process Analysis Report").map_err(fmt_error)?;
        writeln!(output, "================================").map_err(fmt_error)?;
        writeln!(output, "Reconstructed records: {}", report.total_records).map_err(fmt_error)?;
        if let Some(signature) = report.selected_signature {
            writeln!(output, "Scoped to signature: {}", signature).map_err(fmt_error)?;
        }
        writeln!(output).map_err(fmt_error)?;

        output.push_str(&self.format_plot(&report.plot)?);
        writeln!(output).map_err(fmt_error)?;
        output.push_str(&self.format_page(&report.page)?);

        Ok(output)
    }

    /// Format the duration distribution section as text
    pub fn format_plot(&self, plot: &DensityPlot) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Duration Distribution").map_err(fmt_error)?;
        writeln!(output, "---------------------").map_err(fmt_error)?;
        let unit_name = match plot.unit {
            crate::analytics::AxisUnit::Hours => "hours",
            crate::analytics::AxisUnit::Days => "days",
        };
        writeln!(
            output,
            "Axis unit: {} (max duration: {:.2})",
            unit_name, plot.max_duration
        )
        .map_err(fmt_error)?;
        writeln!(output, "Vertical range: 0 to {:.2}", plot.y_range_end).map_err(fmt_error)?;

        if plot.curves.is_empty() {
            writeln!(output, "No signature categories with samples").map_err(fmt_error)?;
        }
        for curve in &plot.curves {
            // Peak of the expected-count curve as a one-line summary
            let peak = curve
                .expected_count
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, &v)| (curve.x_values[i], v))
                .unwrap_or((0.0, 0.0));
            writeln!(
                output,
                "  [{}] {}: {} processes, peak {:.2} at {:.3} {} ({})",
                curve.area_id,
                curve.label,
                curve.total_processes,
                peak.1,
                peak.0,
                unit_name,
                curve.color
            )
            .map_err(fmt_error)?;
        }

        Ok(output)
    }

    /// Format a view page as a text table
    pub fn format_page(&self, page: &ViewPage) -> Result<String> {
        let mut output = String::new();

        writeln!(
            output,
            "Process Records ({} entries, {} pages, next page: {})",
            page.entries.len(),
            page.total_pages,
            if page.has_next_page { "yes" } else { "no" }
        )
        .map_err(fmt_error)?;

        for entry in &page.entries {
            let signature = entry
                .record
                .signature
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                output,
                "  {} | {} -> {} | {} | {} | {}",
                entry.record.process_id,
                entry.record.start_date.format("%Y-%m-%d %H:%M:%S"),
                entry.record.end_date.format("%Y-%m-%d %H:%M:%S"),
                entry.formatted_duration,
                entry.record.username,
                signature
            )
            .map_err(fmt_error)?;
        }

        Ok(output)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}
