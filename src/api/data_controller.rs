use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::core::{
    DataExtent, TimeWindow, ValueAxisOrientation, ValueRange, Viewport, project_line_strip,
};
use crate::error::{GraphError, GraphResult};
use crate::render::{HighlightBand, HighlightMesh, HighlightMeshBuilder, Renderer};

use super::data_window_fetcher::{FetchedWindow, RefreshOutcome, RefreshRequest};
use super::engine::{GraphGeometry, RefreshStatus};
use super::entry_animation::EntryAnimation;
use super::time_axis_labeler::{label_markers, place_labels, reposition_labels};
use super::validation::{validate_highlight, validate_value_range, validate_window};
use super::value_axis_labels::value_axis_labels;
use super::{GraphEngine, ViewportChange};

impl<R: Renderer> GraphEngine<R> {
    /// Requests a refresh of the current window, animated when the config
    /// says so.
    pub fn refresh(&mut self) -> GraphResult<ViewportChange> {
        self.request_refresh(self.settings.animate_refresh)
    }

    /// Schedules a fetch for the current window.
    ///
    /// A collapsed window enters the "no data" state without fetching.
    pub fn request_refresh(&mut self, animate: bool) -> GraphResult<ViewportChange> {
        let window = self.state.window;
        if !window.is_displayable() {
            debug!(
                start = window.start,
                end = window.end,
                "refresh skipped for collapsed window"
            );
            self.clear_geometry();
            self.status = RefreshStatus::NoData;
            return Ok(ViewportChange::None);
        }

        let disposition = self.fetcher.request(RefreshRequest {
            window,
            animate,
            epoch: self.epoch,
        })?;
        trace!(?disposition, animate, "refresh requested");
        self.status = RefreshStatus::Refreshing;
        Ok(ViewportChange::RefreshRequested)
    }

    /// Applies every completed fetch on the caller's timeline.
    ///
    /// Returns the resulting status. When an applied fetch failed, its error is
    /// returned after all outcomes have been processed and the status is
    /// `Failed`; previous geometry stays in place.
    pub fn poll_refresh(&mut self) -> GraphResult<RefreshStatus> {
        let outcomes = match self.fetcher.poll() {
            Ok(outcomes) => outcomes,
            Err(err) => {
                self.status = RefreshStatus::Failed;
                return Err(err);
            }
        };
        let mut failure = None;
        for outcome in outcomes {
            if let Err(err) = self.apply_outcome(outcome) {
                failure = Some(err);
            }
        }
        self.finish_poll(failure)
    }

    /// Blocks up to `timeout` for one fetch to land, then applies it.
    pub fn wait_for_refresh(&mut self, timeout: Duration) -> GraphResult<RefreshStatus> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let outcome = match self.fetcher.wait(remaining) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.status = RefreshStatus::Failed;
                    return Err(err);
                }
            };
            let Some(outcome) = outcome else {
                return Ok(self.status);
            };
            let stale = outcome.request.epoch != self.epoch;
            let result = self.apply_outcome(outcome);
            if !stale || remaining.is_zero() {
                return self.finish_poll(result.err());
            }
        }
    }

    /// Drops all data synchronously and collapses the window to `0..0`.
    /// Fetches already in flight are discarded when they land.
    pub fn clear_data(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.state.window = TimeWindow::empty();
        self.state.reset_transform();
        self.state.clear_gesture();
        self.animation = None;
        self.state.transform.y_scale = 1.0;
        self.clear_geometry();
        self.status = RefreshStatus::NoData;
        debug!(epoch = self.epoch, "graph data cleared");
    }

    /// Sets the visible window and refreshes it.
    pub fn set_visible_period(&mut self, start: i64, end: i64) -> GraphResult<ViewportChange> {
        let window = validate_window(TimeWindow::new(start, end))?;
        self.state.window = window;
        self.state.reset_transform();
        self.state.clear_gesture();
        self.request_refresh(self.settings.animate_refresh)
    }

    pub fn set_value_range(&mut self, range: ValueRange) -> GraphResult<ViewportChange> {
        let range = validate_value_range(range, &self.settings.value_axis_mid_labels)?;
        self.settings.value_range = range;
        self.rebuild_value_labels()?;
        self.refresh_if_loaded()
    }

    pub fn set_value_axis_mid_labels(&mut self, values: Vec<f32>) -> GraphResult<()> {
        self.value_labels = value_axis_labels(
            &values,
            self.settings.value_range,
            self.settings.orientation,
            self.settings.viewport.height as f32,
        )?;
        self.settings.value_axis_mid_labels = values;
        Ok(())
    }

    pub fn set_range_highlights(
        &mut self,
        band: Option<HighlightBand>,
    ) -> GraphResult<ViewportChange> {
        self.settings.highlight = validate_highlight(band)?;
        self.refresh_if_loaded()
    }

    pub fn set_orientation(
        &mut self,
        orientation: ValueAxisOrientation,
    ) -> GraphResult<ViewportChange> {
        self.settings.orientation = orientation;
        self.rebuild_value_labels()?;
        self.refresh_if_loaded()
    }

    pub fn set_allow_scroll(&mut self, allow: bool) {
        self.settings.allow_scroll = allow;
    }

    pub fn set_allow_scale(&mut self, allow: bool) {
        self.settings.allow_scale = allow;
    }

    /// Resizes the plot surface; label offsets follow, geometry does not
    /// change.
    pub fn set_viewport(&mut self, viewport: Viewport) -> GraphResult<()> {
        self.settings.viewport = viewport.validate()?;
        self.reposition_time_labels();
        self.rebuild_value_labels()
    }

    /// Recomputes label pixel offsets for the current window.
    pub(super) fn reposition_time_labels(&mut self) {
        reposition_labels(
            &mut self.geometry.label_entries,
            self.state.window,
            self.settings.viewport.width as f32,
        );
    }

    fn rebuild_value_labels(&mut self) -> GraphResult<()> {
        self.value_labels = value_axis_labels(
            &self.settings.value_axis_mid_labels,
            self.settings.value_range,
            self.settings.orientation,
            self.settings.viewport.height as f32,
        )?;
        Ok(())
    }

    fn refresh_if_loaded(&mut self) -> GraphResult<ViewportChange> {
        if self.geometry.extent.is_none() && self.status != RefreshStatus::Refreshing {
            return Ok(ViewportChange::None);
        }
        self.request_refresh(false)
    }

    fn finish_poll(&mut self, failure: Option<GraphError>) -> GraphResult<RefreshStatus> {
        if let Some(err) = failure {
            self.status = RefreshStatus::Failed;
            return Err(err);
        }
        if self.status != RefreshStatus::Failed && self.fetcher.is_busy()? {
            self.status = RefreshStatus::Refreshing;
        }
        Ok(self.status)
    }

    fn clear_geometry(&mut self) {
        self.geometry = GraphGeometry::default();
    }

    fn apply_outcome(&mut self, outcome: RefreshOutcome) -> GraphResult<()> {
        let RefreshOutcome { request, result } = outcome;
        if request.epoch != self.epoch {
            trace!(
                request_epoch = request.epoch,
                epoch = self.epoch,
                "discarding fetch issued before clear"
            );
            return Ok(());
        }

        let fetched = match result {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(error = %err, "data refresh failed; keeping previous geometry");
                self.status = RefreshStatus::Failed;
                return Err(err);
            }
        };

        let Some(extent) = DataExtent::from_points(&fetched.points) else {
            debug!("refresh returned no data");
            self.clear_geometry();
            self.status = RefreshStatus::NoData;
            return Ok(());
        };

        let window = clamp_to_extent(self.state.window, extent);
        self.rebuild_geometry(fetched, extent, window)?;
        self.state.window = window;
        self.state.reset_for_rebuild();
        if request.animate {
            self.animation = Some(EntryAnimation::start(Instant::now()));
            self.state.transform.y_scale = 0.0;
        }
        self.status = RefreshStatus::Ready;
        Ok(())
    }

    fn rebuild_geometry(
        &mut self,
        fetched: FetchedWindow,
        extent: DataExtent,
        window: TimeWindow,
    ) -> GraphResult<()> {
        let FetchedWindow { points, labels } = fetched;
        let range = self.settings.value_range;
        let orientation = self.settings.orientation;
        let width_px = self.settings.viewport.width as f32;

        let line_strip = project_line_strip(&points, window, range, orientation)?;
        let highlight = match &self.settings.highlight {
            Some(band) => match HighlightMeshBuilder::new(band, range).build(&points, window) {
                Ok(mesh) => mesh.into_clip_space(|unit_y| orientation.apply(unit_y)),
                Err(err) => {
                    warn!(error = %err, "dropping highlight layer");
                    HighlightMesh::default()
                }
            },
            None => HighlightMesh::default(),
        };
        let label_entries = place_labels(&labels, window, width_px);
        let markers = label_markers(&label_entries, width_px);

        debug!(
            points = points.len(),
            labels = label_entries.len(),
            triangles = highlight.triangle_count(),
            start = window.start,
            end = window.end,
            "graph geometry rebuilt"
        );

        self.geometry = GraphGeometry {
            points,
            extent: Some(extent),
            line_strip,
            highlight,
            labels,
            label_entries,
            label_markers: markers,
        };
        Ok(())
    }
}

/// Pulls window edges in to the data extent. Clamping that would collapse the
/// window leaves it unchanged.
fn clamp_to_extent(window: TimeWindow, extent: DataExtent) -> TimeWindow {
    let clamped = TimeWindow::new(
        window.start.max(extent.first.timestamp),
        window.end.min(extent.last.timestamp),
    );
    if clamped.is_displayable() {
        clamped
    } else {
        window
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_to_extent;
    use crate::core::{DataExtent, DataPoint, TimeWindow};

    #[test]
    fn clamp_pulls_edges_to_data() {
        let extent = DataExtent {
            first: DataPoint::new(100, 0.0),
            last: DataPoint::new(900, 0.0),
        };
        assert_eq!(
            clamp_to_extent(TimeWindow::new(0, 1_000), extent),
            TimeWindow::new(100, 900)
        );
        assert_eq!(
            clamp_to_extent(TimeWindow::new(200, 800), extent),
            TimeWindow::new(200, 800)
        );
    }

    #[test]
    fn single_point_extent_keeps_window() {
        let extent = DataExtent {
            first: DataPoint::new(500, 0.0),
            last: DataPoint::new(500, 0.0),
        };
        assert_eq!(
            clamp_to_extent(TimeWindow::new(0, 1_000), extent),
            TimeWindow::new(0, 1_000)
        );
    }
}
