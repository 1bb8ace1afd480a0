use serde::{Deserialize, Serialize};

use crate::core::to_clip;
use crate::error::{GraphError, GraphResult};

/// Divisor used to pack 0–255 channels into mesh colors. Shared by every
/// display mode.
pub const CHANNEL_NORMALIZER: f32 = 127.0;

/// Band color with 0–255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BandColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(default = "default_alpha")]
    pub alpha: u8,
}

fn default_alpha() -> u8 {
    u8::MAX
}

impl BandColor {
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: u8::MAX,
        }
    }

    #[must_use]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Mesh-ready RGBA. Alpha is always emitted opaque.
    #[must_use]
    pub fn packed(self) -> [f32; 4] {
        [
            f32::from(self.red) / CHANNEL_NORMALIZER,
            f32::from(self.green) / CHANNEL_NORMALIZER,
            f32::from(self.blue) / CHANNEL_NORMALIZER,
            1.0,
        ]
    }
}

/// Linear blend of two packed colors; `weight = 0` yields `from`.
#[must_use]
pub fn blend_packed(from: [f32; 4], to: [f32; 4], weight: f32) -> [f32; 4] {
    let weight = weight.clamp(0.0, 1.0);
    let mut out = [0.0; 4];
    for (channel, slot) in out.iter_mut().enumerate() {
        *slot = from[channel] + (to[channel] - from[channel]) * weight;
    }
    out
}

/// Renderer-facing affine transform applied after unit-space mapping.
///
/// `x_offset` and `x_scale_position` are unit-space quantities; use
/// [`PanZoomTransform::clip_x_offset`] and
/// [`PanZoomTransform::clip_x_scale_position`] for shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanZoomTransform {
    pub x_offset: f32,
    pub x_scale: f32,
    pub x_scale_position: f32,
    pub y_scale: f32,
}

impl PanZoomTransform {
    pub const IDENTITY: Self = Self {
        x_offset: 0.0,
        x_scale: 1.0,
        x_scale_position: 0.5,
        y_scale: 1.0,
    };

    #[must_use]
    pub fn is_identity(self) -> bool {
        self.x_offset == 0.0 && self.x_scale == 1.0
    }

    #[must_use]
    pub fn clip_x_offset(self) -> f32 {
        self.x_offset * 2.0
    }

    #[must_use]
    pub fn clip_x_scale_position(self) -> f32 {
        to_clip(self.x_scale_position)
    }

    /// Resets pan/zoom while leaving the entry animation untouched.
    pub fn reset_pan_zoom(&mut self) {
        self.x_offset = 0.0;
        self.x_scale = 1.0;
        self.x_scale_position = 0.5;
    }
}

impl Default for PanZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Highlight triangle mesh: `x, y` per vertex, three indices per triangle and
/// RGBA per vertex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightMesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    pub colors: Vec<f32>,
}

impl HighlightMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Converts unit-space vertices to clip space, applying `map_y` to every
    /// unit y first (value-axis orientation).
    #[must_use]
    pub fn into_clip_space(mut self, map_y: impl Fn(f32) -> f32) -> Self {
        for pair in self.vertices.chunks_exact_mut(2) {
            pair[0] = to_clip(pair[0]);
            pair[1] = to_clip(map_y(pair[1]));
        }
        self
    }

    pub fn validate(&self) -> GraphResult<()> {
        if self.vertices.len() % 2 != 0 {
            return Err(GraphError::InvalidData(
                "mesh vertex buffer must hold x/y pairs".to_owned(),
            ));
        }
        if self.colors.len() != self.vertex_count() * 4 {
            return Err(GraphError::InvalidData(
                "mesh color buffer must hold one RGBA entry per vertex".to_owned(),
            ));
        }
        if self.indices.len() % 3 != 0 {
            return Err(GraphError::InvalidData(
                "mesh index buffer must hold whole triangles".to_owned(),
            ));
        }
        let vertex_count = self.vertex_count();
        if self
            .indices
            .iter()
            .any(|index| usize::from(*index) >= vertex_count)
        {
            return Err(GraphError::InvalidData(
                "mesh index points past the vertex buffer".to_owned(),
            ));
        }
        if self.vertices.iter().any(|coord| !coord.is_finite()) {
            return Err(GraphError::InvalidData(
                "mesh coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Vertical tick marks under each time-axis label, as clip-space line pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMarkers {
    pub vertices: Vec<f32>,
}

impl LabelMarkers {
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.vertices.len() / 4
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
