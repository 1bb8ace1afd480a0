use chrono::{TimeZone, Utc};
use timegraph::api::{
    LabelGranularity, LabelSlotChange, TimeAxisLabelConfig, TimeAxisLabeler, diff_label_slots,
    label_markers, place_labels,
};
use timegraph::core::{DataPoint, TimeAxisLabel, TimeWindow};

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

fn labeler(granularity: LabelGranularity) -> TimeAxisLabeler {
    TimeAxisLabeler::new(&TimeAxisLabelConfig::new(granularity)).expect("labeler")
}

fn millis(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid date")
        .timestamp_millis()
}

#[test]
fn hourly_points_get_one_day_label_per_bucket() {
    let start = millis(2024, 3, 9, 18, 30);
    let points: Vec<DataPoint> = (0..12)
        .map(|i| DataPoint::new(start + i * HOUR, i as f64))
        .collect();

    let labels = labeler(LabelGranularity::Day).label_points(&points);
    assert_eq!(
        labels,
        vec![
            TimeAxisLabel::new(millis(2024, 3, 9, 0, 0), "2024-03-09"),
            TimeAxisLabel::new(millis(2024, 3, 10, 0, 0), "2024-03-10"),
        ]
    );
}

#[test]
fn minute_and_hour_labels_use_clock_format() {
    let points = vec![
        DataPoint::new(millis(2024, 1, 1, 9, 15) + 20_000, 1.0),
        DataPoint::new(millis(2024, 1, 1, 9, 15) + 40_000, 2.0),
        DataPoint::new(millis(2024, 1, 1, 9, 16) + 5_000, 3.0),
    ];
    let minutes = labeler(LabelGranularity::Minute).label_points(&points);
    let texts: Vec<&str> = minutes.iter().map(|label| label.text.as_str()).collect();
    assert_eq!(texts, vec!["09:15", "09:16"]);

    let hours = labeler(LabelGranularity::Hour).label_points(&points);
    assert_eq!(hours, vec![TimeAxisLabel::new(millis(2024, 1, 1, 9, 0), "09:00")]);
}

#[test]
fn custom_format_overrides_default() {
    let config = TimeAxisLabelConfig::new(LabelGranularity::Month).with_format("%b %Y");
    let labeler = TimeAxisLabeler::new(&config).expect("labeler");
    let labels = labeler.label_points(&[DataPoint::new(millis(2024, 2, 14, 0, 0), 1.0)]);
    assert_eq!(labels[0].text, "Feb 2024");
    assert_eq!(labels[0].timestamp, millis(2024, 2, 1, 0, 0));
}

#[test]
fn calendar_walk_includes_empty_buckets_and_excludes_last() {
    let points = vec![
        DataPoint::new(millis(2024, 1, 30, 12, 0), 1.0),
        DataPoint::new(millis(2024, 4, 1, 0, 0), 2.0),
    ];
    let labels = labeler(LabelGranularity::Month).label_span(&points);
    let texts: Vec<&str> = labels.iter().map(|label| label.text.as_str()).collect();
    assert_eq!(texts, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);

    let sparse = labeler(LabelGranularity::Month).label_points(&points);
    assert_eq!(sparse.len(), 2);
}

#[test]
fn week_labels_start_on_monday() {
    // 2024-05-15 is a Wednesday.
    let labels =
        labeler(LabelGranularity::Week).label_points(&[DataPoint::new(millis(2024, 5, 15, 8, 0), 1.0)]);
    assert_eq!(labels[0].text, "2024-05-13");
}

#[test]
fn offsets_follow_window_and_markers_follow_offsets() {
    let labels = vec![
        TimeAxisLabel::new(0, "a"),
        TimeAxisLabel::new(DAY / 2, "b"),
        TimeAxisLabel::new(DAY, "c"),
    ];
    let entries = place_labels(&labels, TimeWindow::new(0, DAY), 1_000.0);
    let offsets: Vec<f32> = entries.iter().map(|entry| entry.pixel_offset).collect();
    assert_eq!(offsets, vec![0.0, 500.0, 1_000.0]);

    let markers = label_markers(&entries, 1_000.0);
    assert_eq!(markers.marker_count(), 3);
    assert!((markers.vertices[0] - (-1.0 + 0.0015)).abs() <= 1e-6);
    assert_eq!(markers.vertices[1], -1.0);
    assert!((markers.vertices[3] - (-0.9)).abs() <= 1e-6);
    assert!((markers.vertices[4] - 0.0015).abs() <= 1e-6);

    assert!(place_labels(&labels, TimeWindow::empty(), 1_000.0).is_empty());
}

#[test]
fn slot_diff_reports_moves_relabels_and_growth() {
    let before = place_labels(
        &[TimeAxisLabel::new(0, "a"), TimeAxisLabel::new(100, "b")],
        TimeWindow::new(0, 200),
        200.0,
    );
    let after = place_labels(
        &[
            TimeAxisLabel::new(0, "a"),
            TimeAxisLabel::new(150, "c"),
            TimeAxisLabel::new(180, "d"),
        ],
        TimeWindow::new(0, 200),
        200.0,
    );
    assert_eq!(
        diff_label_slots(&before, &after),
        vec![
            LabelSlotChange::Unchanged,
            LabelSlotChange::Relabeled,
            LabelSlotChange::Added
        ]
    );

    let shifted = place_labels(
        &[TimeAxisLabel::new(0, "a")],
        TimeWindow::new(-100, 100),
        200.0,
    );
    assert_eq!(
        diff_label_slots(&before, &shifted),
        vec![LabelSlotChange::Moved, LabelSlotChange::Removed]
    );
}
