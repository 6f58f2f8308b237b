//! Unit tests for process reconstruction and density estimation
//!
//! Tests event joining, match strategies, signature attachment, the axis
//! unit decision and the expected-count curves

use chrono::{DateTime, Duration, TimeZone, Utc};
use wf_logstats::parsers::{EventKind, EventSet, LogEvent};
use wf_logstats::{
    AxisUnit, DensityEstimator, MatchStrategy, ProcessReconstructor, ProcessRecord, SignatureType,
};

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// Helper to build a Started event
fn started(timestamp: DateTime<Utc>, process_id: &str) -> LogEvent {
    LogEvent {
        kind: EventKind::Started,
        timestamp,
        username: "system".to_string(),
        message: format!("Started execution for workflow-id: {}", process_id),
        process_id: Some(process_id.to_string()),
        signer: None,
    }
}

/// Helper to build a Completed event
fn completed(timestamp: DateTime<Utc>, process_id: &str, username: &str) -> LogEvent {
    LogEvent {
        kind: EventKind::Completed,
        timestamp,
        username: username.to_string(),
        message: format!(
            "The process with id: {} and tenant domain: acme-1 has been completed",
            process_id
        ),
        process_id: Some(process_id.to_string()),
        signer: None,
    }
}

/// Helper to build a SignatureRecorded event
fn signature(timestamp: DateTime<Utc>, process_id: &str, signer: &str) -> LogEvent {
    LogEvent {
        kind: EventKind::SignatureRecorded,
        timestamp,
        username: "signer".to_string(),
        message: format!("Process id: {} approved with sign by {}", process_id, signer),
        process_id: Some(process_id.to_string()),
        signer: Some(signer.to_string()),
    }
}

/// Helper to build a record with a given duration and category
fn record(duration_hours: f64, signature: Option<SignatureType>) -> ProcessRecord {
    let end_date = ts(2024, 1, 10, 0, 0, 0);
    let start_date = end_date - Duration::milliseconds((duration_hours * 3_600_000.0) as i64);
    ProcessRecord {
        process_id: "1".to_string(),
        start_date,
        end_date,
        duration_hours,
        username: "user".to_string(),
        signature,
    }
}

#[cfg(test)]
mod reconstructor_tests {
    use super::*;

    #[test]
    fn test_single_process_lifecycle() {
        let events = EventSet {
            started: vec![started(ts(2024, 1, 1, 8, 0, 0), "42")],
            signatures: vec![signature(ts(2024, 1, 1, 9, 30, 0), "42", "firmaQualificata")],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.process_id, "42");
        assert_eq!(record.start_date, ts(2024, 1, 1, 8, 0, 0));
        assert_eq!(record.end_date, ts(2024, 1, 2, 10, 0, 0));
        assert_eq!(record.duration_hours, 26.0);
        assert_eq!(record.username, "anna89");
        assert_eq!(record.signature, Some(SignatureType::Qualified));
    }

    #[test]
    fn test_multiple_matching_starts_yield_multiple_records() {
        let events = EventSet {
            started: vec![
                started(ts(2024, 1, 1, 8, 0, 0), "42"),
                started(ts(2024, 1, 1, 12, 0, 0), "42"),
            ],
            signatures: vec![signature(ts(2024, 1, 1, 13, 0, 0), "42", "firmaSemplice")],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records.len(), 2);

        // All records share the end date, username and signature
        for record in &records {
            assert_eq!(record.end_date, ts(2024, 1, 2, 10, 0, 0));
            assert_eq!(record.username, "anna89");
            assert_eq!(record.signature, Some(SignatureType::Simple));
        }
        assert_eq!(records[0].duration_hours, 26.0);
        assert_eq!(records[1].duration_hours, 22.0);
    }

    #[test]
    fn test_substring_match_pairs_prefix_ids() {
        // Process id "4" is a prefix of "42": the substring policy pairs both
        let events = EventSet {
            started: vec![
                started(ts(2024, 1, 1, 8, 0, 0), "4"),
                started(ts(2024, 1, 1, 9, 0, 0), "42"),
            ],
            signatures: vec![],
            completed: vec![completed(ts(2024, 1, 1, 10, 0, 0), "4", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_exact_strategy_rejects_prefix_ids() {
        let events = EventSet {
            started: vec![
                started(ts(2024, 1, 1, 8, 0, 0), "4"),
                started(ts(2024, 1, 1, 9, 0, 0), "42"),
            ],
            signatures: vec![],
            completed: vec![completed(ts(2024, 1, 1, 10, 0, 0), "4", "anna89")],
        };

        let reconstructor = ProcessReconstructor::with_strategy(MatchStrategy::Exact);
        let records = reconstructor.reconstruct(&events);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_date, ts(2024, 1, 1, 8, 0, 0));
    }

    #[test]
    fn test_missing_start_yields_no_records() {
        let events = EventSet {
            started: vec![started(ts(2024, 1, 1, 8, 0, 0), "7")],
            signatures: vec![],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert!(records.is_empty());
    }

    #[test]
    fn test_first_signature_event_wins() {
        let events = EventSet {
            started: vec![started(ts(2024, 1, 1, 8, 0, 0), "42")],
            signatures: vec![
                signature(ts(2024, 1, 1, 9, 0, 0), "42", "firmaAvanzata"),
                signature(ts(2024, 1, 1, 9, 30, 0), "42", "firmaQualificata"),
            ],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records[0].signature, Some(SignatureType::Advanced));
    }

    #[test]
    fn test_signature_for_other_process_is_ignored() {
        let events = EventSet {
            started: vec![started(ts(2024, 1, 1, 8, 0, 0), "42")],
            signatures: vec![signature(ts(2024, 1, 1, 9, 0, 0), "7", "firmaAvanzata")],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records[0].signature, None);
    }

    #[test]
    fn test_unknown_signer_token_means_no_signature() {
        let events = EventSet {
            started: vec![started(ts(2024, 1, 1, 8, 0, 0), "42")],
            signatures: vec![signature(ts(2024, 1, 1, 9, 0, 0), "42", "firmaSconosciuta")],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records[0].signature, None);
    }

    #[test]
    fn test_inconsistent_log_yields_negative_duration() {
        // Start logged after completion; the duration is negative on purpose
        let events = EventSet {
            started: vec![started(ts(2024, 1, 2, 12, 0, 0), "42")],
            signatures: vec![],
            completed: vec![completed(ts(2024, 1, 2, 10, 0, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert_eq!(records[0].duration_hours, -2.0);
    }

    #[test]
    fn test_fractional_durations() {
        let events = EventSet {
            started: vec![started(ts(2024, 1, 1, 8, 0, 0), "42")],
            signatures: vec![],
            completed: vec![completed(ts(2024, 1, 1, 8, 45, 0), "42", "anna89")],
        };

        let records = ProcessReconstructor::new().reconstruct(&events);
        assert!((records[0].duration_hours - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_empty_event_set() {
        let records = ProcessReconstructor::new().reconstruct(&EventSet::default());
        assert!(records.is_empty());
    }
}

#[cfg(test)]
mod density_tests {
    use super::*;

    #[test]
    fn test_unit_decision_boundary() {
        let estimator = DensityEstimator::new();

        let at_boundary = vec![record(24.0, Some(SignatureType::Simple))];
        assert_eq!(estimator.estimate(&at_boundary, None).unit, AxisUnit::Hours);

        let past_boundary = vec![record(24.0001, Some(SignatureType::Simple))];
        let plot = estimator.estimate(&past_boundary, None);
        assert_eq!(plot.unit, AxisUnit::Days);
        assert!((plot.max_duration - 24.0001 / 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_decision_is_global_across_categories() {
        // One short category, one long: both curves share the day unit
        let records = vec![
            record(10.0, Some(SignatureType::Simple)),
            record(30.0, Some(SignatureType::Advanced)),
        ];

        let plot = DensityEstimator::new().estimate(&records, None);
        assert_eq!(plot.unit, AxisUnit::Days);
        assert_eq!(plot.curves.len(), 2);
        for curve in &plot.curves {
            assert!((curve.x_values[999] - 30.0 / 24.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_curves_have_grid_size_points() {
        let records = vec![
            record(5.0, Some(SignatureType::Simple)),
            record(6.0, Some(SignatureType::Simple)),
        ];

        let plot = DensityEstimator::new().estimate(&records, None);
        assert_eq!(plot.curves.len(), 1);

        let curve = &plot.curves[0];
        assert_eq!(curve.x_values.len(), 1_000);
        assert_eq!(curve.expected_count.len(), 1_000);
        assert_eq!(curve.process_count_rounded.len(), 1_000);
        assert_eq!(curve.formatted_duration.len(), 1_000);
        assert_eq!(curve.x_values[0], 0.0);
        assert!(curve.expected_count.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_empty_buckets_are_skipped() {
        let records = vec![
            record(5.0, Some(SignatureType::Simple)),
            record(7.0, Some(SignatureType::Qualified)),
            record(8.0, None),
        ];

        let plot = DensityEstimator::new().estimate(&records, None);
        let area_ids: Vec<usize> = plot.curves.iter().map(|c| c.area_id).collect();
        assert_eq!(area_ids, vec![1, 4]);

        let labels: Vec<&str> = plot.curves.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["firmaSemplice", "firmaQualificata"]);
    }

    #[test]
    fn test_expected_count_integrates_to_sample_size() {
        // Samples well inside the grid so no kernel mass is cut off
        let records = vec![
            record(6.0, Some(SignatureType::Simple)),
            record(8.0, Some(SignatureType::Simple)),
            record(10.0, Some(SignatureType::Simple)),
            record(12.0, Some(SignatureType::Simple)),
            record(20.0, Some(SignatureType::Advanced)),
        ];

        let plot = DensityEstimator::new().estimate(&records, None);
        let curve = plot
            .curves
            .iter()
            .find(|c| c.label == "firmaSemplice")
            .unwrap();

        let mut integral = 0.0;
        for i in 1..curve.x_values.len() {
            let dx = curve.x_values[i] - curve.x_values[i - 1];
            integral += (curve.expected_count[i] + curve.expected_count[i - 1]) / 2.0 * dx;
        }
        assert!(
            (integral - 4.0).abs() < 0.05,
            "integral was {}",
            integral
        );
    }

    #[test]
    fn test_y_range_has_ten_percent_headroom() {
        let records = vec![
            record(6.0, Some(SignatureType::Simple)),
            record(6.5, Some(SignatureType::Simple)),
            record(18.0, Some(SignatureType::Advanced)),
        ];

        let plot = DensityEstimator::new().estimate(&records, None);
        let max_expected = plot
            .curves
            .iter()
            .flat_map(|c| c.expected_count.iter())
            .fold(0.0_f64, |acc, &v| acc.max(v));
        assert!((plot.y_range_end - max_expected * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_empty_plot() {
        let plot = DensityEstimator::new().estimate(&[], None);

        assert_eq!(plot.unit, AxisUnit::Hours);
        assert_eq!(plot.max_duration, 0.0);
        assert_eq!(plot.y_range_end, 0.0);
        assert_eq!(plot.x_range_start, 0.0);
        assert!(plot.curves.is_empty());
        assert!(plot.legend.is_empty());
    }

    #[test]
    fn test_scenario_peak_in_day_units() {
        // A single 26-hour process: day units, peak at the grid point
        // nearest 26/24 days
        let records = vec![record(26.0, Some(SignatureType::Qualified))];

        let plot = DensityEstimator::new().estimate(&records, None);
        assert_eq!(plot.unit, AxisUnit::Days);

        let curve = &plot.curves[0];
        assert_eq!(curve.total_processes, 1);
        assert_eq!(curve.area_id, 4);

        let (peak_index, _) = curve
            .expected_count
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert_eq!(peak_index, 999);
        assert!((curve.x_values[peak_index] - 26.0 / 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_scoped_estimate_restricts_curves_and_axis_start() {
        let records = vec![
            record(5.0, Some(SignatureType::Qualified)),
            record(9.0, Some(SignatureType::Qualified)),
        ];

        let plot = DensityEstimator::new().estimate(&records, Some(SignatureType::Qualified));
        assert_eq!(plot.curves.len(), 1);
        assert_eq!(plot.curves[0].area_id, 4);
        assert_eq!(plot.x_range_start, 5.0);
        assert_eq!(plot.max_duration, 9.0);
    }

    #[test]
    fn test_point_labels_match_axis_unit() {
        let records = vec![record(12.0, Some(SignatureType::Simple))];

        let plot = DensityEstimator::new().estimate(&records, None);
        let curve = &plot.curves[0];
        // Final grid point sits at 12 hours
        assert_eq!(
            curve.formatted_duration[999],
            "0 giorni, 12 ore, 0 minuti, 0 secondi"
        );
        assert_eq!(curve.formatted_duration[0], "0 giorni, 0 ore, 0 minuti, 0 secondi");
    }

    #[test]
    fn test_expected_count_scales_with_sample_size() {
        // Two identical samples double the curve of one
        let one = vec![record(5.0, Some(SignatureType::Simple))];
        let two = vec![
            record(5.0, Some(SignatureType::Simple)),
            record(5.0, Some(SignatureType::Simple)),
        ];

        let plot_one = DensityEstimator::new().estimate(&one, None);
        let plot_two = DensityEstimator::new().estimate(&two, None);

        let c1 = &plot_one.curves[0];
        let c2 = &plot_two.curves[0];
        for i in 0..c1.expected_count.len() {
            assert!((c2.expected_count[i] - 2.0 * c1.expected_count[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_custom_bandwidth_smooths_wider() {
        let records = vec![
            record(5.0, Some(SignatureType::Simple)),
            record(15.0, Some(SignatureType::Simple)),
        ];

        let narrow = DensityEstimator::new().estimate(&records, None);
        let wide = DensityEstimator::new()
            .with_bandwidth(5.0)
            .estimate(&records, None);

        // Wider bandwidth lowers the peaks
        let peak = |p: &wf_logstats::DensityPlot| {
            p.curves[0]
                .expected_count
                .iter()
                .fold(0.0_f64, |acc, &v| acc.max(v))
        };
        assert!(peak(&wide) < peak(&narrow));
    }
}
