use tracing::debug;

use crate::error::GraphResult;
use crate::interaction::GestureState;
use crate::render::Renderer;

use super::data_window_fetcher::{DataProvider, DataWindowFetcher};
use super::engine::{GraphGeometry, GraphSettings, RefreshStatus};
use super::time_axis_labeler::TimeAxisLabeler;
use super::value_axis_labels::value_axis_labels;
use super::viewport_state::ViewportState;
use super::{GraphEngine, GraphEngineConfig};

impl<R: Renderer> GraphEngine<R> {
    /// Creates an engine from a validated config. No data is fetched until
    /// [`GraphEngine::refresh`] is called.
    pub fn new(
        renderer: R,
        provider: impl DataProvider,
        config: GraphEngineConfig,
    ) -> GraphResult<Self> {
        config.validate()?;

        let labeler = config
            .time_axis_labels
            .as_ref()
            .map(TimeAxisLabeler::new)
            .transpose()?;
        let fetcher = DataWindowFetcher::new(Box::new(provider), labeler, config.fetch_backend)?;
        let value_labels = value_axis_labels(
            &config.value_axis_mid_labels,
            config.value_range,
            config.orientation,
            config.viewport.height as f32,
        )?;

        debug!(
            start = config.window.start,
            end = config.window.end,
            backend = ?config.fetch_backend,
            "graph engine created"
        );

        Ok(Self {
            renderer,
            settings: GraphSettings {
                viewport: config.viewport,
                value_range: config.value_range,
                orientation: config.orientation,
                highlight: config.highlight,
                allow_scroll: config.allow_scroll,
                allow_scale: config.allow_scale,
                animate_refresh: config.animate_refresh,
                value_axis_mid_labels: config.value_axis_mid_labels,
            },
            state: ViewportState::new(config.window),
            gesture: GestureState::default(),
            fetcher,
            geometry: GraphGeometry::default(),
            value_labels,
            status: RefreshStatus::Idle,
            epoch: 0,
            animation: None,
        })
    }
}
