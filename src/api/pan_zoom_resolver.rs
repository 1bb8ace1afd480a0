//! Pure pan/zoom arithmetic against the data extent.

use crate::core::{DataExtent, TimeWindow, scale_value};

use super::viewport_state::ZoomBaseline;

/// Smallest window a zoom step may produce, in milliseconds.
pub const MIN_WINDOW_SPAN_MS: i64 = 1;

/// Applied pan: shifted window and the delta actually realized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanResolution {
    pub window: TimeWindow,
    pub realized_delta: f64,
}

/// Clamps a normalized pan delta so the window never leaves the data.
///
/// When the data is no wider than the window, the window may only move until
/// one of its edges meets the matching data edge. When the data is wider, the
/// window stays inside it.
#[must_use]
pub fn clamp_pan_delta(window: TimeWindow, extent: DataExtent, delta: f64) -> f64 {
    let span = window.span() as f64;
    let start_to_first = (window.start - extent.first.timestamp) as f64 / span;
    let end_to_last = (window.end - extent.last.timestamp) as f64 / span;

    if extent.fits_within(window) {
        if delta > 0.0 {
            delta.min(end_to_last)
        } else {
            delta.max(start_to_first)
        }
    } else if delta > 0.0 {
        delta.min(start_to_first)
    } else {
        delta.max(end_to_last)
    }
}

/// Resolves a pan step. Returns `None` when the truncated shift is zero.
///
/// Positive deltas move the window toward earlier timestamps.
#[must_use]
pub fn resolve_pan(window: TimeWindow, extent: DataExtent, delta: f64) -> Option<PanResolution> {
    if !window.is_displayable() || delta == 0.0 || !delta.is_finite() {
        return None;
    }

    let span = window.span();
    let clamped = clamp_pan_delta(window, extent, delta);
    let shift = (span as f64 * clamped).trunc() as i64;
    if shift == 0 {
        return None;
    }

    Some(PanResolution {
        window: window.shifted(-shift),
        realized_delta: shift as f64 / span as f64,
    })
}

/// `true` when a zoom step may proceed: zooming in always, zooming out only
/// while the data is wider than the window.
#[must_use]
pub fn zoom_allowed(window: TimeWindow, extent: DataExtent, delta: f64) -> bool {
    delta > 0.0 || !extent.fits_within(window)
}

/// Window for `scale` (relative to the baseline) around `anchor`.
#[must_use]
pub fn zoom_window(baseline: ZoomBaseline, scale: f64, anchor: f64) -> TimeWindow {
    let (start, end) = (baseline.start as f64, baseline.end as f64);
    let timing_scale = 1.0 / scale;
    TimeWindow::new(
        scale_value(start, end, start, timing_scale, anchor).round() as i64,
        scale_value(start, end, end, timing_scale, anchor).round() as i64,
    )
}

/// Edge the zoomed window is pinned to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePin {
    pub window: TimeWindow,
    /// Anchor forced for the rest of the gesture: `0` start, `1` end.
    pub forced_anchor: f32,
}

/// Detects empty space exposed on one side only and shifts the window back
/// onto the data.
#[must_use]
pub fn resolve_edge_pin(window: TimeWindow, extent: DataExtent) -> Option<EdgePin> {
    let start_to_first = extent.first.timestamp - window.start;
    let end_to_last = window.end - extent.last.timestamp;

    if start_to_first > 0 && end_to_last <= 0 {
        Some(EdgePin {
            window: window.shifted(start_to_first),
            forced_anchor: 0.0,
        })
    } else if end_to_last > 0 && start_to_first <= 0 {
        Some(EdgePin {
            window: window.shifted(-end_to_last),
            forced_anchor: 1.0,
        })
    } else {
        None
    }
}
