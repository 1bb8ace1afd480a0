use crate::core::{LineStrip, TimeAxisLabelEntry, ValueAxisLabel, Viewport};
use crate::error::{GraphError, GraphResult};
use crate::render::{HighlightMesh, LabelMarkers, PanZoomTransform};

/// Backend-agnostic scene for one graph draw pass.
///
/// Geometry is borrowed from the engine; only the transform changes between
/// frames while the user pans or zooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame<'a> {
    pub viewport: Viewport,
    pub transform: PanZoomTransform,
    pub line_strip: &'a LineStrip,
    pub highlight: &'a HighlightMesh,
    pub label_markers: &'a LabelMarkers,
    pub time_labels: &'a [TimeAxisLabelEntry],
    pub value_labels: &'a [ValueAxisLabel],
}

impl RenderFrame<'_> {
    pub fn validate(&self) -> GraphResult<()> {
        if !self.viewport.is_valid() {
            return Err(GraphError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        let transform = self.transform;
        if ![
            transform.x_offset,
            transform.x_scale,
            transform.x_scale_position,
            transform.y_scale,
        ]
        .iter()
        .all(|value| value.is_finite())
        {
            return Err(GraphError::InvalidData(
                "pan/zoom transform must be finite".to_owned(),
            ));
        }
        if transform.x_scale <= 0.0 {
            return Err(GraphError::InvalidData(
                "pan/zoom scale must be > 0".to_owned(),
            ));
        }

        if self.line_strip.vertices.len() % 2 != 0
            || self.line_strip.vertices.iter().any(|coord| !coord.is_finite())
        {
            return Err(GraphError::InvalidData(
                "line strip must hold finite x/y pairs".to_owned(),
            ));
        }
        if self.label_markers.vertices.len() % 4 != 0 {
            return Err(GraphError::InvalidData(
                "label markers must hold whole line segments".to_owned(),
            ));
        }
        self.highlight.validate()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_strip.is_empty() && self.highlight.is_empty() && self.label_markers.is_empty()
    }
}
