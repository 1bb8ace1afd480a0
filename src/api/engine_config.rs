use serde::{Deserialize, Serialize};

use crate::core::{TimeWindow, ValueAxisOrientation, ValueRange, Viewport};
use crate::error::{GraphError, GraphResult};
use crate::render::HighlightBand;

use super::data_window_fetcher::FetchBackend;
use super::time_axis_labeler::TimeAxisLabelConfig;
use super::validation::validate_graph_config;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load graph
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEngineConfig {
    pub viewport: Viewport,
    /// Initial visible window; refreshed against the data extent.
    pub window: TimeWindow,
    #[serde(default)]
    pub value_range: ValueRange,
    #[serde(default)]
    pub highlight: Option<HighlightBand>,
    #[serde(default = "default_allow_scroll")]
    pub allow_scroll: bool,
    #[serde(default = "default_allow_scale")]
    pub allow_scale: bool,
    /// Play the y-scale entry ramp on refreshes requested by the host.
    #[serde(default = "default_animate_refresh")]
    pub animate_refresh: bool,
    #[serde(default)]
    pub orientation: ValueAxisOrientation,
    #[serde(default)]
    pub value_axis_mid_labels: Vec<f32>,
    /// Built-in calendar labels; `None` asks the data provider instead.
    #[serde(default)]
    pub time_axis_labels: Option<TimeAxisLabelConfig>,
    #[serde(default)]
    pub fetch_backend: FetchBackend,
}

impl GraphEngineConfig {
    /// Creates a config with default value range and behavior flags.
    #[must_use]
    pub fn new(viewport: Viewport, window: TimeWindow) -> Self {
        Self {
            viewport,
            window,
            value_range: ValueRange::default(),
            highlight: None,
            allow_scroll: default_allow_scroll(),
            allow_scale: default_allow_scale(),
            animate_refresh: default_animate_refresh(),
            orientation: ValueAxisOrientation::default(),
            value_axis_mid_labels: Vec::new(),
            time_axis_labels: None,
            fetch_backend: FetchBackend::default(),
        }
    }

    #[must_use]
    pub fn with_value_range(mut self, value_range: ValueRange) -> Self {
        self.value_range = value_range;
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, band: HighlightBand) -> Self {
        self.highlight = Some(band);
        self
    }

    #[must_use]
    pub fn with_allow_scroll(mut self, allow: bool) -> Self {
        self.allow_scroll = allow;
        self
    }

    #[must_use]
    pub fn with_allow_scale(mut self, allow: bool) -> Self {
        self.allow_scale = allow;
        self
    }

    #[must_use]
    pub fn with_animate_refresh(mut self, animate: bool) -> Self {
        self.animate_refresh = animate;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: ValueAxisOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_value_axis_mid_labels(mut self, values: Vec<f32>) -> Self {
        self.value_axis_mid_labels = values;
        self
    }

    #[must_use]
    pub fn with_time_axis_labels(mut self, config: TimeAxisLabelConfig) -> Self {
        self.time_axis_labels = Some(config);
        self
    }

    #[must_use]
    pub fn with_fetch_backend(mut self, backend: FetchBackend) -> Self {
        self.fetch_backend = backend;
        self
    }

    pub fn validate(&self) -> GraphResult<()> {
        validate_graph_config(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> GraphResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| GraphError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_allow_scroll() -> bool {
    true
}

fn default_allow_scale() -> bool {
    true
}

fn default_animate_refresh() -> bool {
    true
}
