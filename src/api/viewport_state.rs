use serde::{Deserialize, Serialize};

use crate::core::TimeWindow;
use crate::render::PanZoomTransform;

/// Window captured right before the first zoom step of a gesture sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomBaseline {
    pub start: i64,
    pub end: i64,
}

impl ZoomBaseline {
    #[must_use]
    pub fn from_window(window: TimeWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }

    #[must_use]
    pub fn window(self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

/// Main-timeline viewport: visible window, renderer transform and zoom
/// bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub(super) window: TimeWindow,
    pub(super) transform: PanZoomTransform,
    pub(super) baseline: Option<ZoomBaseline>,
    /// Accumulated scale relative to `baseline`.
    pub(super) gesture_scale: f64,
    /// Accumulated scale relative to the last rebuilt geometry; drives
    /// `transform.x_scale`.
    pub(super) geometry_scale: f64,
    pub(super) forced_anchor: Option<f32>,
}

impl ViewportState {
    #[must_use]
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            transform: PanZoomTransform::IDENTITY,
            baseline: None,
            gesture_scale: 1.0,
            geometry_scale: 1.0,
            forced_anchor: None,
        }
    }

    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    #[must_use]
    pub fn transform(&self) -> PanZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn baseline(&self) -> Option<ZoomBaseline> {
        self.baseline
    }

    #[must_use]
    pub fn forced_anchor(&self) -> Option<f32> {
        self.forced_anchor
    }

    /// Clears per-gesture zoom state.
    pub(super) fn clear_gesture(&mut self) {
        self.baseline = None;
        self.gesture_scale = 1.0;
        self.forced_anchor = None;
    }

    /// Drops pan and zoom relative to the geometry.
    pub(super) fn reset_transform(&mut self) {
        self.transform.reset_pan_zoom();
        self.geometry_scale = 1.0;
    }

    /// Geometry was rebuilt for the current window.
    pub(super) fn reset_for_rebuild(&mut self) {
        self.reset_transform();
        self.baseline = None;
        self.gesture_scale = 1.0;
    }
}
