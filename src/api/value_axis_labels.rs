use crate::core::{ValueAxisLabel, ValueAxisOrientation, ValueRange};
use crate::error::{GraphError, GraphResult};

/// Rejects mid-label values outside `[min, max]` or non-finite.
pub fn validate_mid_labels(values: &[f32], range: ValueRange) -> GraphResult<()> {
    for value in values {
        if !value.is_finite() {
            return Err(GraphError::InvalidConfig(
                "value-axis mid label must be finite".to_owned(),
            ));
        }
        if !range.contains(*value) {
            return Err(GraphError::InvalidConfig(format!(
                "value-axis mid label {value} lies outside [{}, {}]",
                range.min, range.max
            )));
        }
    }
    Ok(())
}

/// Vertical pixel offset of `value` from the top plot edge.
#[must_use]
pub fn value_label_offset(
    value: f32,
    range: ValueRange,
    orientation: ValueAxisOrientation,
    height_px: f32,
) -> f32 {
    let from_top = (range.max - value) / range.span();
    match orientation {
        ValueAxisOrientation::Upward => from_top * height_px,
        ValueAxisOrientation::Downward => (1.0 - from_top) * height_px,
    }
}

/// Min, max and mid labels ordered by value.
pub fn value_axis_labels(
    mid_values: &[f32],
    range: ValueRange,
    orientation: ValueAxisOrientation,
    height_px: f32,
) -> GraphResult<Vec<ValueAxisLabel>> {
    validate_mid_labels(mid_values, range)?;

    let mut values = Vec::with_capacity(mid_values.len() + 2);
    values.push(range.min);
    values.extend(
        mid_values
            .iter()
            .copied()
            .filter(|value| *value > range.min && *value < range.max),
    );
    values.push(range.max);
    values.sort_by(f32::total_cmp);
    values.dedup();

    Ok(values
        .into_iter()
        .map(|value| ValueAxisLabel {
            value,
            pixel_offset: value_label_offset(value, range, orientation, height_px),
        })
        .collect())
}
