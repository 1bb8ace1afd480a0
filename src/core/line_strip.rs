use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::normalized_space::{to_clip, to_unit_x, to_unit_y};
use crate::core::{DataPoint, TimeWindow, ValueAxisOrientation, ValueRange};
use crate::error::{GraphError, GraphResult};

/// Data polyline in clip space, two floats (`x`, `y`) per vertex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStrip {
    pub vertices: Vec<f32>,
}

impl LineStrip {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Projects points into a clip-space line strip for `window` and `range`.
///
/// The function is deterministic and side-effect free so both rendering and
/// tests consume the exact same geometry.
pub fn project_line_strip(
    points: &[DataPoint],
    window: TimeWindow,
    range: ValueRange,
    orientation: ValueAxisOrientation,
) -> GraphResult<LineStrip> {
    if !window.is_displayable() {
        return Err(GraphError::InvalidData(
            "line strip window must have a positive width".to_owned(),
        ));
    }

    let project = |point: &DataPoint| -> [f32; 2] {
        let x = to_unit_x(point.timestamp, window) as f32;
        let y = orientation.apply(to_unit_y(point.value, range) as f32);
        [to_clip(x), to_clip(y)]
    };

    // Large refreshes can carry tens of thousands of samples; the optional
    // parallel path keeps output order identical to the serial one.
    #[cfg(feature = "parallel-projection")]
    let vertices: Vec<f32> = points.par_iter().flat_map_iter(project).collect();

    #[cfg(not(feature = "parallel-projection"))]
    let vertices: Vec<f32> = points.iter().flat_map(project).collect();

    Ok(LineStrip { vertices })
}
