//! Data analysis modules for workflow log data

pub mod density;
pub mod processes;

pub use density::{
    format_hour_tick, AxisUnit, DensityCurve, DensityEstimator, DensityPlot, LegendItem,
};
pub use processes::{MatchStrategy, ProcessReconstructor, ProcessRecord};

/// Render a duration in seconds as a human-readable label.
///
/// The wording matches the labels the source system exposes to its users,
/// e.g. `1 giorni, 2 ore, 0 minuti, 30 secondi`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as i64;
    let days = total / 86_400;
    let remainder = total % 86_400;
    let hours = remainder / 3_600;
    let minutes = (remainder % 3_600) / 60;
    let secs = remainder % 60;
    format!("{} giorni, {} ore, {} minuti, {} secondi", days, hours, minutes, secs)
}
