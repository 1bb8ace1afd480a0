use crate::error::GraphResult;
use crate::render::{PanZoomTransform, RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_line_vertex_count: usize,
    pub last_triangle_count: usize,
    pub last_marker_count: usize,
    pub last_label_count: usize,
    pub last_transform: Option<PanZoomTransform>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> GraphResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_vertex_count = frame.line_strip.vertex_count();
        self.last_triangle_count = frame.highlight.triangle_count();
        self.last_marker_count = frame.label_markers.marker_count();
        self.last_label_count = frame.time_labels.len();
        self.last_transform = Some(frame.transform);
        Ok(())
    }
}
