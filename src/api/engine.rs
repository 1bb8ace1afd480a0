use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::{
    DataExtent, DataPoint, LineStrip, TimeAxisLabel, TimeAxisLabelEntry, TimeWindow,
    ValueAxisLabel, ValueAxisOrientation, ValueRange, Viewport,
};
use crate::error::GraphResult;
use crate::interaction::{GestureMode, GestureState};
use crate::render::{
    HighlightBand, HighlightMesh, LabelMarkers, PanZoomTransform, RenderFrame, Renderer,
};

use super::data_window_fetcher::DataWindowFetcher;
use super::entry_animation::EntryAnimation;
use super::viewport_state::{ViewportState, ZoomBaseline};

/// What a host should do after an engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportChange {
    /// Nothing changed; no re-render needed.
    None,
    /// Window or transform changed; re-render with the existing geometry.
    Transformed,
    /// A data refresh was scheduled; geometry will be rebuilt when it lands.
    RefreshRequested,
}

/// Progress of the data pipeline, for progress indicators and "no data" text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefreshStatus {
    /// No refresh requested yet.
    #[default]
    Idle,
    Refreshing,
    /// The last applied fetch was empty or the window is collapsed.
    NoData,
    Ready,
    /// The last fetch failed; previous geometry is kept.
    Failed,
}

/// Geometry rebuilt on every applied refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct GraphGeometry {
    pub(super) points: Vec<DataPoint>,
    pub(super) extent: Option<DataExtent>,
    pub(super) line_strip: LineStrip,
    pub(super) highlight: HighlightMesh,
    pub(super) labels: Vec<TimeAxisLabel>,
    pub(super) label_entries: Vec<TimeAxisLabelEntry>,
    pub(super) label_markers: LabelMarkers,
}

/// Presentation settings that survive refreshes.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct GraphSettings {
    pub(super) viewport: Viewport,
    pub(super) value_range: ValueRange,
    pub(super) orientation: ValueAxisOrientation,
    pub(super) highlight: Option<HighlightBand>,
    pub(super) allow_scroll: bool,
    pub(super) allow_scale: bool,
    pub(super) animate_refresh: bool,
    pub(super) value_axis_mid_labels: Vec<f32>,
}

/// Main orchestration facade consumed by host applications.
///
/// `GraphEngine` owns the viewport state, the data fetcher and the rebuilt
/// geometry, and hands frames to an injected [`Renderer`]. Every method runs
/// on the caller's (main) timeline; only provider calls may run elsewhere.
pub struct GraphEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) settings: GraphSettings,
    pub(super) state: ViewportState,
    pub(super) gesture: GestureState,
    pub(super) fetcher: DataWindowFetcher,
    pub(super) geometry: GraphGeometry,
    pub(super) value_labels: Vec<ValueAxisLabel>,
    pub(super) status: RefreshStatus,
    pub(super) epoch: u64,
    pub(super) animation: Option<EntryAnimation>,
}

impl<R: Renderer> GraphEngine<R> {
    /// Builds the current frame and hands it to the renderer.
    pub fn render(&mut self) -> GraphResult<()> {
        let frame = RenderFrame {
            viewport: self.settings.viewport,
            transform: self.state.transform,
            line_strip: &self.geometry.line_strip,
            highlight: &self.geometry.highlight,
            label_markers: &self.geometry.label_markers,
            time_labels: &self.geometry.label_entries,
            value_labels: &self.value_labels,
        };
        self.renderer.render(&frame)
    }

    /// Steps the entry animation. Returns `true` while it is still running.
    pub fn advance_animation(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        self.state.transform.y_scale = animation.y_scale_at(now);
        if animation.is_finished(now) {
            self.animation = None;
            return false;
        }
        true
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.settings.viewport
    }

    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.state.window()
    }

    #[must_use]
    pub fn transform(&self) -> PanZoomTransform {
        self.state.transform()
    }

    #[must_use]
    pub fn zoom_baseline(&self) -> Option<ZoomBaseline> {
        self.state.baseline()
    }

    #[must_use]
    pub fn forced_anchor(&self) -> Option<f32> {
        self.state.forced_anchor()
    }

    #[must_use]
    pub fn gesture_mode(&self) -> GestureMode {
        self.gesture.mode()
    }

    #[must_use]
    pub fn refresh_status(&self) -> RefreshStatus {
        self.status
    }

    #[must_use]
    pub fn value_range(&self) -> ValueRange {
        self.settings.value_range
    }

    #[must_use]
    pub fn orientation(&self) -> ValueAxisOrientation {
        self.settings.orientation
    }

    #[must_use]
    pub fn highlight_band(&self) -> Option<&HighlightBand> {
        self.settings.highlight.as_ref()
    }

    #[must_use]
    pub fn allow_scroll(&self) -> bool {
        self.settings.allow_scroll
    }

    #[must_use]
    pub fn allow_scale(&self) -> bool {
        self.settings.allow_scale
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.geometry.points
    }

    #[must_use]
    pub fn data_extent(&self) -> Option<DataExtent> {
        self.geometry.extent
    }

    #[must_use]
    pub fn line_strip(&self) -> &LineStrip {
        &self.geometry.line_strip
    }

    #[must_use]
    pub fn highlight_mesh(&self) -> &HighlightMesh {
        &self.geometry.highlight
    }

    #[must_use]
    pub fn time_labels(&self) -> &[TimeAxisLabelEntry] {
        &self.geometry.label_entries
    }

    #[must_use]
    pub fn label_markers(&self) -> &LabelMarkers {
        &self.geometry.label_markers
    }

    #[must_use]
    pub fn value_labels(&self) -> &[ValueAxisLabel] {
        &self.value_labels
    }
}
