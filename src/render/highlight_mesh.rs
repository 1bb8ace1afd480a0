//! Range-highlight triangle mesh generation.
//!
//! All geometry is produced in upward unit space (`[0, 1]` on both axes). The
//! caller converts to clip space and applies the value-axis orientation.
//!
//! Every quad or triangle is first materialized as a [`HighlightPiece`] so the
//! vertical coverage of a segment can be inspected; [`HighlightMeshBuilder::build`]
//! then flattens pieces into index/vertex/color buffers.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::normalized_space::{to_unit_x, to_unit_y, value_to_unit};
use crate::core::{DataPoint, TimeWindow, ValueRange};
use crate::error::{GraphError, GraphResult};
use crate::render::primitives::{BandColor, HighlightMesh, blend_packed};

/// Fraction of the value range blended on each side of an interior threshold.
pub const DEFAULT_FADE_FRACTION: f32 = 0.05;

const MAX_MESH_VERTICES: usize = u16::MAX as usize + 1;

/// Horizontal unit-space extent of background quads: the visible window plus
/// one span of fetch padding on each side.
pub const BACKGROUND_X_EXTENT: (f32, f32) = (-1.0, 2.0);

/// How threshold bands are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Full-width band per threshold interval.
    #[default]
    Background,
    /// Full-width bands blended across each interior threshold.
    BackgroundFaded,
    /// Bands clipped to the area under the data line.
    Underline,
    /// Clipped bands blended across each interior threshold.
    UnderlineFaded,
}

impl DisplayMode {
    #[must_use]
    pub fn is_faded(self) -> bool {
        matches!(self, Self::BackgroundFaded | Self::UnderlineFaded)
    }

    #[must_use]
    pub fn follows_data(self) -> bool {
        matches!(self, Self::Underline | Self::UnderlineFaded)
    }
}

/// Ordered thresholds (`N + 1`) with one color per interval (`N`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightBand {
    pub thresholds: Vec<f32>,
    pub colors: Vec<BandColor>,
    #[serde(default)]
    pub mode: DisplayMode,
    #[serde(default = "default_fade_fraction")]
    pub fade_fraction: f32,
}

fn default_fade_fraction() -> f32 {
    DEFAULT_FADE_FRACTION
}

impl HighlightBand {
    pub fn new(
        thresholds: Vec<f32>,
        colors: Vec<BandColor>,
        mode: DisplayMode,
    ) -> GraphResult<Self> {
        let band = Self {
            thresholds,
            colors,
            mode,
            fade_fraction: DEFAULT_FADE_FRACTION,
        };
        band.validate()?;
        Ok(band)
    }

    pub fn with_fade_fraction(mut self, fade_fraction: f32) -> GraphResult<Self> {
        self.fade_fraction = fade_fraction;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> GraphResult<()> {
        if self.thresholds.len() < 2 {
            return Err(GraphError::InvalidConfig(
                "highlight band needs at least two thresholds".to_owned(),
            ));
        }
        if self.thresholds.iter().any(|value| !value.is_finite()) {
            return Err(GraphError::InvalidConfig(
                "highlight thresholds must be finite".to_owned(),
            ));
        }
        if let Some(pair) = self
            .thresholds
            .windows(2)
            .find(|pair| OrderedFloat(pair[0]) >= OrderedFloat(pair[1]))
        {
            return Err(GraphError::InvalidConfig(format!(
                "highlight thresholds must be strictly ascending ({} is followed by {})",
                pair[0], pair[1]
            )));
        }
        if self.colors.len() + 1 != self.thresholds.len() {
            return Err(GraphError::InvalidConfig(format!(
                "highlight band with {} thresholds needs {} colors, got {}",
                self.thresholds.len(),
                self.thresholds.len() - 1,
                self.colors.len()
            )));
        }
        if !self.fade_fraction.is_finite()
            || self.fade_fraction <= 0.0
            || self.fade_fraction > 0.5
        {
            return Err(GraphError::InvalidConfig(
                "highlight fade fraction must be finite and in (0, 0.5]".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Point in upward unit space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPoint {
    pub x: f32,
    pub y: f32,
}

impl UnitPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    /// Full-width band slice (background modes).
    Background,
    /// Flat slice below the lower end of a segment.
    Under,
    /// Slice between two successive crossings while climbing a segment.
    Crossing,
    /// Triangle closing a segment at its upper end.
    Cap,
}

/// One quad (4 vertices) or triangle (3 vertices) of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightPiece {
    pub kind: PieceKind,
    pub y_low: f32,
    pub y_high: f32,
    pub vertices: SmallVec<[UnitPoint; 4]>,
    pub colors: SmallVec<[[f32; 4]; 4]>,
}

impl HighlightPiece {
    #[must_use]
    pub fn span(&self) -> f32 {
        self.y_high - self.y_low
    }

    #[must_use]
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }
}

#[derive(Debug, Clone, Copy)]
struct FadeZone {
    lower: f32,
    threshold: f32,
    upper: f32,
    below: usize,
}

/// Unit-space view of a band: levels, packed colors, fade zones, break points.
#[derive(Debug, Clone)]
struct BandPalette {
    levels: Vec<f32>,
    colors: Vec<[f32; 4]>,
    zones: Vec<FadeZone>,
    breakpoints: Vec<f32>,
    faded: bool,
}

impl BandPalette {
    fn new(band: &HighlightBand, range: ValueRange) -> Self {
        let levels: Vec<f32> = band
            .thresholds
            .iter()
            .map(|threshold| value_to_unit(*threshold, range))
            .collect();
        let colors = band.colors.iter().map(|color| color.packed()).collect();
        let faded = band.mode.is_faded();

        let mut zones = Vec::new();
        if faded {
            let fade = band.fade_fraction;
            for index in 1..levels.len().saturating_sub(1) {
                let threshold = levels[index];
                let below_mid = (levels[index - 1] + threshold) * 0.5;
                let above_mid = (threshold + levels[index + 1]) * 0.5;
                zones.push(FadeZone {
                    lower: (threshold - fade).max(below_mid),
                    threshold,
                    upper: (threshold + fade).min(above_mid),
                    below: index - 1,
                });
            }
        }

        let mut breakpoints = levels.clone();
        for zone in &zones {
            breakpoints.push(zone.lower);
            breakpoints.push(zone.upper);
        }
        breakpoints.sort_by_key(|level| OrderedFloat(*level));
        breakpoints.dedup();

        Self {
            levels,
            colors,
            zones,
            breakpoints,
            faded,
        }
    }

    fn lowest(&self) -> f32 {
        self.levels[0]
    }

    fn highest(&self) -> f32 {
        self.levels[self.levels.len() - 1]
    }

    fn covers(&self, y: f32) -> bool {
        y >= self.lowest() && y <= self.highest()
    }

    fn band_index_at(&self, y: f32) -> usize {
        let last_band = self.colors.len() - 1;
        self.levels[1..]
            .iter()
            .position(|upper| y < *upper)
            .unwrap_or(last_band)
            .min(last_band)
    }

    fn solid_color_at(&self, y: f32) -> [f32; 4] {
        self.colors[self.band_index_at(y)]
    }

    fn faded_color_at(&self, y: f32) -> [f32; 4] {
        for zone in &self.zones {
            if y < zone.lower || y > zone.upper {
                continue;
            }
            let weight = if y < zone.threshold {
                let width = zone.threshold - zone.lower;
                if width > 0.0 {
                    0.5 * (y - zone.lower) / width
                } else {
                    0.5
                }
            } else {
                let width = zone.upper - zone.threshold;
                if width > 0.0 {
                    0.5 + 0.5 * (y - zone.threshold) / width
                } else {
                    0.5
                }
            };
            return blend_packed(self.colors[zone.below], self.colors[zone.below + 1], weight);
        }
        self.solid_color_at(y)
    }

    /// Per-vertex colors for a piece spanning `[y_low, y_high]`.
    fn piece_colors(&self, vertices: &[UnitPoint], y_low: f32, y_high: f32) -> SmallVec<[[f32; 4]; 4]> {
        if self.faded {
            vertices
                .iter()
                .map(|vertex| self.faded_color_at(vertex.y))
                .collect()
        } else {
            let color = self.solid_color_at((y_low + y_high) * 0.5);
            vertices.iter().map(|_| color).collect()
        }
    }

    fn piece(&self, kind: PieceKind, y_low: f32, y_high: f32, vertices: &[UnitPoint]) -> Option<HighlightPiece> {
        if y_high <= y_low || !self.covers((y_low + y_high) * 0.5) {
            return None;
        }
        Some(HighlightPiece {
            kind,
            y_low,
            y_high,
            vertices: vertices.iter().copied().collect(),
            colors: self.piece_colors(vertices, y_low, y_high),
        })
    }
}

/// Intersects segment `start → end` with the horizontal line `y = range_y`.
///
/// Uses the two-line determinant form. Returns `None` when either end lies on
/// the line, when the lines are parallel (`determinant == 0`) or when the
/// intersection falls outside the segment.
#[must_use]
pub fn threshold_intersection(start: UnitPoint, end: UnitPoint, range_y: f32) -> Option<UnitPoint> {
    if start.y == range_y || end.y == range_y {
        return None;
    }

    let a1 = end.y - start.y;
    let b1 = start.x - end.x;
    let c1 = a1 * start.x + b1 * start.y;

    let a2 = 0.0;
    let b2 = start.x - end.x;
    let c2 = a2 * start.x + b2 * range_y;

    let determinant = a1 * b2 - a2 * b1;
    if determinant == 0.0 {
        return None;
    }

    let point = UnitPoint {
        x: (b2 * c1 - b1 * c2) / determinant,
        y: (a1 * c2 - a2 * c1) / determinant,
    };
    let inside = point.x <= start.x.max(end.x)
        && point.x >= start.x.min(end.x)
        && point.y <= start.y.max(end.y)
        && point.y >= start.y.min(end.y);
    inside.then_some(point)
}

/// Builds highlight geometry for one band configuration and value range.
#[derive(Debug, Clone)]
pub struct HighlightMeshBuilder {
    mode: DisplayMode,
    range: ValueRange,
    palette: BandPalette,
}

impl HighlightMeshBuilder {
    #[must_use]
    pub fn new(band: &HighlightBand, range: ValueRange) -> Self {
        Self {
            mode: band.mode,
            range,
            palette: BandPalette::new(band, range),
        }
    }

    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// All pieces for `points` rendered against `window`.
    ///
    /// A collapsed window yields no pieces. Background modes ignore the points.
    #[must_use]
    pub fn pieces(&self, points: &[DataPoint], window: TimeWindow) -> Vec<HighlightPiece> {
        if !window.is_displayable() {
            return Vec::new();
        }

        if !self.mode.follows_data() {
            return self.background_pieces();
        }

        let mut pieces = Vec::with_capacity(points.len().saturating_sub(1) * 4);
        for pair in points.windows(2) {
            let start = self.to_unit(pair[0], window);
            let end = self.to_unit(pair[1], window);
            pieces.extend(self.segment_pieces(start, end));
        }
        pieces
    }

    /// Full-width slices between consecutive break points.
    #[must_use]
    pub fn background_pieces(&self) -> Vec<HighlightPiece> {
        let (left, right) = BACKGROUND_X_EXTENT;
        self.palette
            .breakpoints
            .windows(2)
            .filter_map(|pair| {
                let (low, high) = (pair[0], pair[1]);
                self.palette.piece(
                    PieceKind::Background,
                    low,
                    high,
                    &[
                        UnitPoint::new(left, low),
                        UnitPoint::new(left, high),
                        UnitPoint::new(right, high),
                        UnitPoint::new(right, low),
                    ],
                )
            })
            .collect()
    }

    /// Underline pieces for one unit-space segment.
    ///
    /// The segment is reordered so that it climbs; the flat region below its
    /// lower end is covered by `Under` pieces, the region between the line and
    /// the upper end's vertical by `Crossing` pieces and a closing `Cap`.
    #[must_use]
    pub fn segment_pieces(&self, start: UnitPoint, end: UnitPoint) -> SmallVec<[HighlightPiece; 8]> {
        let (low, high) = if end.y < start.y {
            (end, start)
        } else {
            (start, end)
        };
        let mut pieces = SmallVec::new();

        for pair in self.palette.breakpoints.windows(2) {
            let interval_low = pair[0];
            if interval_low >= low.y {
                break;
            }
            let interval_high = pair[1].min(low.y);
            pieces.extend(self.palette.piece(
                PieceKind::Under,
                interval_low,
                interval_high,
                &[
                    UnitPoint::new(low.x, interval_low),
                    UnitPoint::new(low.x, interval_high),
                    UnitPoint::new(high.x, interval_high),
                    UnitPoint::new(high.x, interval_low),
                ],
            ));
            if pair[1] >= low.y {
                break;
            }
        }

        if low.y == high.y {
            return pieces;
        }

        let mut last = low;
        for level in self.palette.breakpoints.iter().copied() {
            if level <= low.y {
                continue;
            }
            if level >= high.y {
                break;
            }
            let Some(crossing) = threshold_intersection(low, high, level) else {
                break;
            };
            pieces.extend(self.palette.piece(
                PieceKind::Crossing,
                last.y,
                crossing.y,
                &[
                    last,
                    crossing,
                    UnitPoint::new(high.x, crossing.y),
                    UnitPoint::new(high.x, last.y),
                ],
            ));
            last = crossing;
        }

        pieces.extend(self.palette.piece(
            PieceKind::Cap,
            last.y,
            high.y,
            &[last, high, UnitPoint::new(high.x, last.y)],
        ));
        pieces
    }

    /// Flattens all pieces into mesh buffers (unit space).
    pub fn build(&self, points: &[DataPoint], window: TimeWindow) -> GraphResult<HighlightMesh> {
        let pieces = self.pieces(points, window);
        let mesh = flatten_pieces(&pieces)?;
        trace!(
            mode = ?self.mode,
            pieces = pieces.len(),
            vertices = mesh.vertex_count(),
            "built highlight mesh"
        );
        Ok(mesh)
    }

    fn to_unit(&self, point: DataPoint, window: TimeWindow) -> UnitPoint {
        UnitPoint {
            x: to_unit_x(point.timestamp, window) as f32,
            y: to_unit_y(point.value, self.range) as f32,
        }
    }
}

/// Flattens pieces into buffers; quads become two triangles.
pub fn flatten_pieces(pieces: &[HighlightPiece]) -> GraphResult<HighlightMesh> {
    let vertex_total: usize = pieces.iter().map(|piece| piece.vertices.len()).sum();
    if vertex_total > MAX_MESH_VERTICES {
        return Err(GraphError::MeshTooLarge {
            vertices: vertex_total,
        });
    }

    let mut mesh = HighlightMesh {
        vertices: Vec::with_capacity(vertex_total * 2),
        indices: Vec::with_capacity(vertex_total * 3 / 2),
        colors: Vec::with_capacity(vertex_total * 4),
    };

    let mut index_start: u16 = 0;
    for piece in pieces {
        for vertex in &piece.vertices {
            mesh.vertices.push(vertex.x);
            mesh.vertices.push(vertex.y);
        }
        for color in &piece.colors {
            mesh.colors.extend_from_slice(color);
        }

        mesh.indices
            .extend_from_slice(&[index_start, index_start + 1, index_start + 2]);
        if piece.vertices.len() == 4 {
            mesh.indices
                .extend_from_slice(&[index_start, index_start + 2, index_start + 3]);
        }
        // The last piece may end exactly at the u16 boundary.
        index_start = index_start.wrapping_add(piece.vertices.len() as u16);
    }

    Ok(mesh)
}
