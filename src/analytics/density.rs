//! Kernel density estimation over process durations

use crate::analytics::{format_duration, ProcessRecord};
use crate::signature::{CategoryTable, SignatureType};
use log::warn;
use serde::Serialize;
use std::f64::consts::PI;

/// Display unit of the duration axis, decided once from the global maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisUnit {
    Hours,
    Days,
}

impl AxisUnit {
    /// Durations up to one day render in hours, anything longer in days
    pub fn from_max_hours(max_hours: f64) -> Self {
        if max_hours <= 24.0 {
            AxisUnit::Hours
        } else {
            AxisUnit::Days
        }
    }

    /// Axis caption as exposed to the rendering layer
    pub fn axis_label(&self) -> &'static str {
        match self {
            AxisUnit::Hours => "Durata (hh:mm)",
            AxisUnit::Days => "Durata (giorni)",
        }
    }

    /// Seconds in one unit of this axis
    pub fn seconds_per_unit(&self) -> f64 {
        match self {
            AxisUnit::Hours => 3_600.0,
            AxisUnit::Days => 86_400.0,
        }
    }
}

/// Axis tick formatter used when the axis is scoped to hours: a fractional
/// hour value becomes an `H:MM` string.
pub fn format_hour_tick(value: f64) -> String {
    let hours = value.floor() as i64;
    let minutes = (value.fract() * 60.0).round() as i64;
    format!("{}:{:02}", hours, minutes)
}

/// Count-scaled density curve for one signature category
#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    /// Signer token of the category
    pub label: String,
    /// 1000 duration points, uniform over `[0, max_duration]`, display unit
    pub x_values: Vec<f64>,
    /// Density × sample size at each point
    pub expected_count: Vec<f64>,
    /// `expected_count` rounded to whole processes, for point tooltips
    pub process_count_rounded: Vec<i64>,
    /// Human-readable duration label for each point
    pub formatted_duration: Vec<String>,
    /// Sample size of the category
    pub total_processes: usize,
    /// 1-based palette slot of the category
    pub area_id: usize,
    pub color: String,
}

/// Legend entry for one plotted category
#[derive(Debug, Clone, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
    pub area_id: usize,
}

/// Rendering-ready plot descriptor: axis metadata plus one curve per
/// non-empty signature category.
#[derive(Debug, Serialize)]
pub struct DensityPlot {
    pub unit: AxisUnit,
    pub x_axis_label: &'static str,
    pub y_axis_label: &'static str,
    /// Global maximum duration in the display unit; 0 for empty input
    pub max_duration: f64,
    /// Lower bound of the duration axis; the scoped minimum when drilling
    /// into one category, 0 otherwise
    pub x_range_start: f64,
    /// Maximum expected count across all curves plus 10% headroom
    pub y_range_end: f64,
    pub curves: Vec<DensityCurve>,
    pub legend: Vec<LegendItem>,
}

/// Gaussian kernel density estimator over per-category duration samples.
///
/// The bandwidth is expressed in the active display unit and is deliberately
/// not re-normalized when the unit switches from hours to days, so the
/// effective smoothing width changes meaning with the unit.
pub struct DensityEstimator {
    bandwidth: f64,
    grid_points: usize,
    categories: CategoryTable,
}

impl DensityEstimator {
    pub fn new() -> Self {
        Self {
            bandwidth: 1.0,
            grid_points: 1_000,
            categories: CategoryTable::default(),
        }
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    pub fn with_categories(mut self, categories: CategoryTable) -> Self {
        self.categories = categories;
        self
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Build the plot descriptor for the given records.
    ///
    /// When `selected` names a category, only that category's curve is built
    /// and the axis starts at the scoped minimum duration. The unit decision
    /// always comes from the maximum over the full `records` input, so all
    /// curves of one view share a unit. Empty input yields a descriptor with
    /// no curves.
    pub fn estimate(
        &self,
        records: &[ProcessRecord],
        selected: Option<SignatureType>,
    ) -> DensityPlot {
        let max_hours = records
            .iter()
            .map(|r| r.duration_hours)
            .fold(0.0_f64, f64::max);
        let unit = AxisUnit::from_max_hours(max_hours);
        let scale = match unit {
            AxisUnit::Hours => 1.0,
            AxisUnit::Days => 1.0 / 24.0,
        };
        let max_duration = max_hours * scale;

        let mut curves = Vec::new();
        let mut legend = Vec::new();
        let mut max_expected = 0.0_f64;

        for entry in self.categories.iter() {
            if selected.is_some() && selected != Some(entry.signature) {
                continue;
            }

            let times: Vec<f64> = records
                .iter()
                .filter(|r| r.signature == Some(entry.signature))
                .map(|r| r.duration_hours * scale)
                .collect();

            if times.is_empty() {
                warn!("No samples for signature category: {}", entry.signature);
                continue;
            }

            let x_values = linspace(max_duration, self.grid_points);
            let sample_size = times.len();
            let expected_count: Vec<f64> = x_values
                .iter()
                .map(|&x| gaussian_density(&times, self.bandwidth, x) * sample_size as f64)
                .collect();

            max_expected = expected_count.iter().fold(max_expected, |acc, &v| acc.max(v));

            let process_count_rounded = expected_count.iter().map(|&v| v.round() as i64).collect();
            let formatted_duration = x_values
                .iter()
                .map(|&x| format_duration(x * unit.seconds_per_unit()))
                .collect();

            curves.push(DensityCurve {
                label: entry.signature.to_string(),
                x_values,
                expected_count,
                process_count_rounded,
                formatted_duration,
                total_processes: sample_size,
                area_id: entry.area_id,
                color: entry.color.to_string(),
            });
            legend.push(LegendItem {
                label: entry.signature.to_string(),
                color: entry.color.to_string(),
                area_id: entry.area_id,
            });
        }

        let x_range_start = match selected {
            Some(signature) => records
                .iter()
                .filter(|r| r.signature == Some(signature))
                .map(|r| r.duration_hours * scale)
                .fold(f64::INFINITY, f64::min)
                .min(max_duration)
                .max(0.0),
            None => 0.0,
        };

        DensityPlot {
            unit,
            x_axis_label: unit.axis_label(),
            y_axis_label: "Numero di processi",
            max_duration,
            x_range_start,
            y_range_end: max_expected * 1.1,
            curves,
            legend,
        }
    }
}

impl Default for DensityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// `points` values uniformly spaced over `[0, max]`
fn linspace(max: f64, points: usize) -> Vec<f64> {
    if points <= 1 {
        return vec![0.0; points];
    }
    let step = max / (points - 1) as f64;
    (0..points).map(|i| i as f64 * step).collect()
}

/// Gaussian kernel density estimate of `samples` evaluated at `x`
fn gaussian_density(samples: &[f64], bandwidth: f64, x: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let norm = (2.0 * PI).sqrt() * bandwidth * samples.len() as f64;
    let sum: f64 = samples
        .iter()
        .map(|&s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
        .sum();
    sum / norm
}
