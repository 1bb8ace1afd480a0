mod frame;
pub mod highlight_mesh;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use highlight_mesh::{
    BACKGROUND_X_EXTENT, DEFAULT_FADE_FRACTION, DisplayMode, HighlightBand, HighlightMeshBuilder,
    HighlightPiece, PieceKind, UnitPoint, flatten_pieces, threshold_intersection,
};
pub use null_renderer::NullRenderer;
pub use primitives::{
    BandColor, CHANNEL_NORMALIZER, HighlightMesh, LabelMarkers, PanZoomTransform, blend_packed,
};

use crate::error::GraphResult;

/// Contract implemented by any draw target.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from viewport and gesture logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> GraphResult<()>;
}
