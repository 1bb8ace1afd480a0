use crate::core::{DataPoint, TimeWindow};

/// Returns points whose timestamp falls inside an inclusive time window.
#[must_use]
pub fn points_in_time_window(points: &[DataPoint], window: TimeWindow) -> Vec<DataPoint> {
    let (min_t, max_t) = if window.start <= window.end {
        (window.start, window.end)
    } else {
        (window.end, window.start)
    };

    points
        .iter()
        .copied()
        .filter(|point| point.timestamp >= min_t && point.timestamp <= max_t)
        .collect()
}

/// Sorts by timestamp and keeps the last sample for duplicated timestamps.
///
/// Providers are expected to hand over ascending data already; this keeps the
/// "ascending, one sample per timestamp" invariant cheap to restore when they
/// do not.
#[must_use]
pub fn canonicalize_points(mut points: Vec<DataPoint>) -> Vec<DataPoint> {
    if points.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp) {
        return points;
    }

    points.sort_by_key(|point| point.timestamp);
    let mut canonical: Vec<DataPoint> = Vec::with_capacity(points.len());
    for point in points {
        match canonical.last_mut() {
            Some(last) if last.timestamp == point.timestamp => *last = point,
            _ => canonical.push(point),
        }
    }
    canonical
}
