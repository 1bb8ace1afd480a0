use crate::core::{TimeWindow, ValueRange};
use crate::error::{GraphError, GraphResult};
use crate::render::HighlightBand;

use super::GraphEngineConfig;
use super::time_axis_labeler::TimeAxisLabeler;
use super::value_axis_labels::validate_mid_labels;

pub(super) fn validate_graph_config(config: &GraphEngineConfig) -> GraphResult<()> {
    config.viewport.validate()?;
    validate_window(config.window)?;
    config.value_range.validate()?;
    if let Some(band) = &config.highlight {
        band.validate()?;
    }
    validate_mid_labels(&config.value_axis_mid_labels, config.value_range)?;
    if let Some(labels) = &config.time_axis_labels {
        TimeAxisLabeler::new(labels)?;
    }
    Ok(())
}

/// A collapsed window is accepted (it is the "no data" window); an inverted
/// one is not.
pub(super) fn validate_window(window: TimeWindow) -> GraphResult<TimeWindow> {
    if window.end < window.start {
        return Err(GraphError::InvalidConfig(format!(
            "time window end ({}) must not precede start ({})",
            window.end, window.start
        )));
    }
    Ok(window)
}

pub(super) fn validate_highlight(
    band: Option<HighlightBand>,
) -> GraphResult<Option<HighlightBand>> {
    if let Some(band) = &band {
        band.validate()?;
    }
    Ok(band)
}

pub(super) fn validate_value_range(range: ValueRange, mid_labels: &[f32]) -> GraphResult<ValueRange> {
    let range = range.validate()?;
    validate_mid_labels(mid_labels, range)?;
    Ok(range)
}
