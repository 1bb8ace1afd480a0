use tracing::{debug, trace};

use crate::error::{GraphError, GraphResult};
use crate::render::Renderer;

use super::pan_zoom_resolver::{
    MIN_WINDOW_SPAN_MS, PanResolution, resolve_edge_pin, resolve_pan, zoom_allowed, zoom_window,
};
use super::viewport_state::ZoomBaseline;
use super::{GraphEngine, ViewportChange};

impl<R: Renderer> GraphEngine<R> {
    /// Starts a new gesture sequence: clears the zoom baseline and any forced
    /// anchor.
    pub fn begin_gesture(&mut self) {
        self.gesture.on_gesture_begin();
        self.state.clear_gesture();
    }

    /// Pans by a normalized delta (fraction of the visible span).
    ///
    /// Positive deltas reveal earlier data. The delta is clamped against the
    /// data extent; the realized part accumulates in the transform offset.
    pub fn pan_by(&mut self, delta: f64) -> GraphResult<ViewportChange> {
        if !delta.is_finite() {
            return Err(GraphError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }
        if delta == 0.0 || !self.settings.allow_scroll {
            return Ok(ViewportChange::None);
        }
        let Some(extent) = self.geometry.extent else {
            return Ok(ViewportChange::None);
        };
        let Some(resolution) = resolve_pan(self.state.window, extent, delta) else {
            return Ok(ViewportChange::None);
        };

        self.apply_pan(resolution);
        self.gesture.on_pan();
        trace!(
            delta,
            realized = resolution.realized_delta,
            start = self.state.window.start,
            end = self.state.window.end,
            "pan applied"
        );
        Ok(ViewportChange::Transformed)
    }

    /// Zooms by a normalized delta around `anchor` (`0` left edge, `1` right
    /// edge of the plot).
    ///
    /// The window is always re-derived from the baseline captured at the
    /// first zoom step of the gesture, while the renderer scale accumulates
    /// against the geometry last rebuilt. When a step exposes empty space on one
    /// side only, the window is pinned to that data edge, the anchor is
    /// forced to it for the rest of the gesture and a refresh is requested.
    pub fn scale_by(&mut self, delta: f64, anchor: f64) -> GraphResult<ViewportChange> {
        if !delta.is_finite() || delta <= -1.0 {
            return Err(GraphError::InvalidData(
                "scale delta must be finite and > -1".to_owned(),
            ));
        }
        if !anchor.is_finite() || !(0.0..=1.0).contains(&anchor) {
            return Err(GraphError::InvalidData(
                "scale anchor must be within [0, 1]".to_owned(),
            ));
        }
        if delta == 0.0 || !self.settings.allow_scale {
            return Ok(ViewportChange::None);
        }
        let Some(extent) = self.geometry.extent else {
            return Ok(ViewportChange::None);
        };
        let window = self.state.window;
        if !window.is_displayable() || !zoom_allowed(window, extent, delta) {
            return Ok(ViewportChange::None);
        }

        let anchor = self.state.forced_anchor.map_or(anchor, f64::from);
        let (fold, baseline) = match self.state.baseline {
            Some(baseline) => (None, baseline),
            None => {
                let offset = f64::from(self.state.transform.x_offset);
                let fold = if offset == 0.0 {
                    None
                } else {
                    resolve_pan(window, extent, -offset)
                };
                let folded = fold.map_or(window, |resolution| resolution.window);
                (fold, ZoomBaseline::from_window(folded))
            }
        };

        let scale = self.state.gesture_scale * (1.0 + delta);
        let candidate = zoom_window(baseline, scale, anchor);
        if candidate.span() < MIN_WINDOW_SPAN_MS {
            debug!(scale, "zoom step rejected: window would collapse");
            return Ok(ViewportChange::None);
        }

        if let Some(resolution) = fold {
            self.apply_pan(resolution);
        }
        self.state.baseline = Some(baseline);
        self.state.gesture_scale = scale;
        self.state.geometry_scale *= 1.0 + delta;
        self.gesture.on_scale();

        if let Some(pin) = resolve_edge_pin(candidate, extent) {
            self.state.window = pin.window;
            self.state.forced_anchor = Some(pin.forced_anchor);
            self.reposition_time_labels();
            debug!(
                forced_anchor = pin.forced_anchor,
                start = pin.window.start,
                end = pin.window.end,
                "zoom pinned to data edge"
            );
            self.request_refresh(false)?;
            return Ok(ViewportChange::RefreshRequested);
        }

        self.state.window = candidate;
        self.state.transform.x_scale = self.state.geometry_scale as f32;
        self.state.transform.x_scale_position = anchor as f32;
        self.reposition_time_labels();
        trace!(
            scale,
            anchor,
            start = candidate.start,
            end = candidate.end,
            "zoom applied"
        );
        Ok(ViewportChange::Transformed)
    }

    /// Ends the gesture sequence. A sequence that zoomed requests a refresh
    /// so geometry is rebuilt at the new resolution.
    pub fn end_gesture(&mut self) -> GraphResult<ViewportChange> {
        let scaled = self.gesture.on_gesture_end();
        self.state.clear_gesture();
        if scaled {
            self.request_refresh(false)?;
            return Ok(ViewportChange::RefreshRequested);
        }
        Ok(ViewportChange::None)
    }

    fn apply_pan(&mut self, resolution: PanResolution) {
        self.state.window = resolution.window;
        self.state.transform.x_offset += resolution.realized_delta as f32;
        self.reposition_time_labels();
    }
}
