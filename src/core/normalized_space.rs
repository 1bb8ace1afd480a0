//! Window/value-range to unit-square and clip-space mapping.
//!
//! Unit space is `[0, 1]` per axis; clip space is `[-1, 1]`. Everything here is
//! pure so mesh building, line-strip projection and label placement share the
//! exact same arithmetic.

use serde::{Deserialize, Serialize};

use crate::core::{TimeWindow, ValueRange};

/// Direction in which values grow on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueAxisOrientation {
    /// Larger values are drawn higher.
    #[default]
    Upward,
    /// Larger values are drawn lower.
    Downward,
}

impl ValueAxisOrientation {
    /// Applies the orientation to an upward unit-space y.
    #[must_use]
    pub fn apply(self, unit_y: f32) -> f32 {
        match self {
            Self::Upward => unit_y,
            Self::Downward => 1.0 - unit_y,
        }
    }
}

/// Maps a timestamp into unit space. The caller guarantees a displayable window.
#[must_use]
pub fn to_unit_x(timestamp: i64, window: TimeWindow) -> f64 {
    (timestamp - window.start) as f64 / (window.end - window.start) as f64
}

/// Guarded variant of [`to_unit_x`]; `None` for zero or negative width.
#[must_use]
pub fn checked_to_unit_x(timestamp: i64, window: TimeWindow) -> Option<f64> {
    window
        .is_displayable()
        .then(|| to_unit_x(timestamp, window))
}

#[must_use]
pub fn to_unit_y(value: f64, range: ValueRange) -> f64 {
    (value - f64::from(range.min)) / f64::from(range.span())
}

/// Unit-space threshold position, kept in `f32` like the mesh buffers.
#[must_use]
pub fn value_to_unit(value: f32, range: ValueRange) -> f32 {
    (value - range.min) / range.span()
}

#[must_use]
pub fn to_clip(unit: f32) -> f32 {
    unit * 2.0 - 1.0
}

/// Rescales `value` around a normalized anchor inside `[range_start, range_end]`.
///
/// `value` is normalized against the range, its signed distance from `anchor`
/// is multiplied by `scale`, and the result is mapped back. The point at the
/// anchor stays fixed for every `scale`.
#[must_use]
pub fn scale_value(range_start: f64, range_end: f64, value: f64, scale: f64, anchor: f64) -> f64 {
    let range_size = range_end - range_start;
    let normalized_value = (value - range_start) / range_size;
    let distance = anchor - normalized_value;
    range_start + range_size * (anchor - distance * scale)
}

#[cfg(test)]
mod tests {
    use super::{ValueAxisOrientation, checked_to_unit_x, scale_value, to_clip, to_unit_x};
    use crate::core::TimeWindow;

    #[test]
    fn unit_x_maps_window_edges() {
        let window = TimeWindow::new(1_000, 3_000);
        assert_eq!(to_unit_x(1_000, window), 0.0);
        assert_eq!(to_unit_x(3_000, window), 1.0);
        assert_eq!(to_unit_x(2_000, window), 0.5);
    }

    #[test]
    fn checked_unit_x_rejects_collapsed_window() {
        assert!(checked_to_unit_x(5, TimeWindow::new(10, 10)).is_none());
        assert!(checked_to_unit_x(5, TimeWindow::new(10, 0)).is_none());
    }

    #[test]
    fn clip_mapping_spans_minus_one_to_one() {
        assert_eq!(to_clip(0.0), -1.0);
        assert_eq!(to_clip(0.5), 0.0);
        assert_eq!(to_clip(1.0), 1.0);
    }

    #[test]
    fn scale_value_keeps_anchor_fixed() {
        let anchored = scale_value(0.0, 100.0, 25.0, 3.0, 0.25);
        assert!((anchored - 25.0).abs() <= 1e-12);

        let start = scale_value(0.0, 100.0, 0.0, 0.5, 0.5);
        let end = scale_value(0.0, 100.0, 100.0, 0.5, 0.5);
        assert!((start - 25.0).abs() <= 1e-12);
        assert!((end - 75.0).abs() <= 1e-12);
    }

    #[test]
    fn downward_orientation_flips_unit_y() {
        assert_eq!(ValueAxisOrientation::Downward.apply(0.25), 0.75);
        assert_eq!(ValueAxisOrientation::Upward.apply(0.25), 0.25);
    }
}
