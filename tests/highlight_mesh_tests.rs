use approx::assert_abs_diff_eq;
use timegraph::core::{DataPoint, TimeWindow, ValueRange};
use timegraph::error::GraphError;
use timegraph::render::{
    BACKGROUND_X_EXTENT, BandColor, DisplayMode, HighlightBand, HighlightMeshBuilder,
    PieceKind, UnitPoint, flatten_pieces,
};

const A: BandColor = BandColor::rgb(127, 0, 0);
const B: BandColor = BandColor::rgb(0, 127, 0);
const C: BandColor = BandColor::rgb(0, 0, 127);

fn three_band(mode: DisplayMode) -> HighlightBand {
    HighlightBand::new(vec![0.0, 25.0, 75.0, 100.0], vec![A, B, C], mode).expect("valid band")
}

fn builder(mode: DisplayMode) -> HighlightMeshBuilder {
    HighlightMeshBuilder::new(&three_band(mode), ValueRange::default())
}

#[test]
fn underline_segment_climbs_through_three_bands() {
    let builder = builder(DisplayMode::Underline);
    let pieces = builder.segment_pieces(UnitPoint::new(0.0, 0.1), UnitPoint::new(1.0, 0.9));

    // The flat region under the low endpoint is one extra piece in band A.
    let under: Vec<_> = pieces
        .iter()
        .filter(|piece| piece.kind == PieceKind::Under)
        .collect();
    assert_eq!(under.len(), 1);
    assert_abs_diff_eq!(under[0].y_low, 0.0);
    assert_abs_diff_eq!(under[0].y_high, 0.1);
    assert_eq!(under[0].colors[0], A.packed());

    let climbing: Vec<_> = pieces
        .iter()
        .filter(|piece| piece.kind != PieceKind::Under)
        .collect();
    assert_eq!(climbing.len(), 3);

    assert_eq!(climbing[0].kind, PieceKind::Crossing);
    assert_abs_diff_eq!(climbing[0].y_low, 0.1, epsilon = 1e-6);
    assert_abs_diff_eq!(climbing[0].y_high, 0.25, epsilon = 1e-6);
    assert!(climbing[0].colors.iter().all(|color| *color == A.packed()));

    assert_eq!(climbing[1].kind, PieceKind::Crossing);
    assert_abs_diff_eq!(climbing[1].y_low, 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(climbing[1].y_high, 0.75, epsilon = 1e-6);
    assert!(climbing[1].colors.iter().all(|color| *color == B.packed()));

    let cap = climbing[2];
    assert_eq!(cap.kind, PieceKind::Cap);
    assert!(cap.is_triangle());
    assert_eq!(cap.vertices[1], UnitPoint::new(1.0, 0.9));
    assert_abs_diff_eq!(cap.y_low, 0.75, epsilon = 1e-6);
    assert!(cap.colors.iter().all(|color| *color == C.packed()));
}

#[test]
fn crossing_points_lie_on_the_segment() {
    let builder = builder(DisplayMode::Underline);
    let pieces = builder.segment_pieces(UnitPoint::new(0.0, 0.1), UnitPoint::new(1.0, 0.9));
    let first_crossing = pieces
        .iter()
        .find(|piece| piece.kind == PieceKind::Crossing)
        .expect("crossing");
    // y = 0.1 + 0.8x reaches 0.25 at x = 0.1875.
    assert_abs_diff_eq!(first_crossing.vertices[1].x, 0.1875, epsilon = 1e-6);
    assert_abs_diff_eq!(first_crossing.vertices[2].x, 1.0);
}

#[test]
fn descending_segment_is_reordered() {
    let builder = builder(DisplayMode::Underline);
    let rising = builder.segment_pieces(UnitPoint::new(0.0, 0.1), UnitPoint::new(1.0, 0.9));
    let falling = builder.segment_pieces(UnitPoint::new(0.0, 0.9), UnitPoint::new(1.0, 0.1));
    assert_eq!(rising.len(), falling.len());
    let cap = falling.last().expect("cap");
    assert_eq!(cap.kind, PieceKind::Cap);
    assert_eq!(cap.vertices[1], UnitPoint::new(0.0, 0.9));
}

#[test]
fn flat_segment_only_fills_below() {
    let builder = builder(DisplayMode::Underline);
    let pieces = builder.segment_pieces(UnitPoint::new(0.0, 0.5), UnitPoint::new(1.0, 0.5));
    assert_eq!(pieces.len(), 2);
    assert!(pieces.iter().all(|piece| piece.kind == PieceKind::Under));
    assert_abs_diff_eq!(pieces[1].y_high, 0.5);
    assert_eq!(pieces[1].colors[0], B.packed());
}

#[test]
fn regions_outside_thresholds_stay_uncolored() {
    let band = HighlightBand::new(vec![20.0, 80.0], vec![A], DisplayMode::Underline)
        .expect("valid band");
    let builder = HighlightMeshBuilder::new(&band, ValueRange::default());
    let pieces = builder.segment_pieces(UnitPoint::new(0.0, 0.0), UnitPoint::new(1.0, 1.0));
    assert_eq!(pieces.len(), 1);
    assert_abs_diff_eq!(pieces[0].y_low, 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(pieces[0].y_high, 0.8, epsilon = 1e-6);
}

#[test]
fn background_mode_covers_every_band_across_padding() {
    let builder = builder(DisplayMode::Background);
    let pieces = builder.background_pieces();
    assert_eq!(pieces.len(), 3);
    let (left, right) = BACKGROUND_X_EXTENT;
    for piece in &pieces {
        assert_eq!(piece.kind, PieceKind::Background);
        assert_eq!(piece.vertices[0].x, left);
        assert_eq!(piece.vertices[2].x, right);
    }

    let mesh = flatten_pieces(&pieces).expect("mesh");
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 6);
    assert_eq!(mesh.colors.len(), 48);
    assert_eq!(&mesh.indices[..6], &[0, 1, 2, 0, 2, 3]);
    mesh.validate().expect("valid mesh");
}

#[test]
fn faded_background_blends_across_interior_thresholds() {
    let builder = builder(DisplayMode::BackgroundFaded);
    let pieces = builder.background_pieces();
    // Three bands split by two fade zones of two halves each.
    assert_eq!(pieces.len(), 7);

    let below_threshold = &pieces[1];
    assert_abs_diff_eq!(below_threshold.y_low, 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(below_threshold.y_high, 0.25, epsilon = 1e-6);
    assert_eq!(below_threshold.colors[0], A.packed());
    let at_threshold = below_threshold.colors[1];
    assert_abs_diff_eq!(at_threshold[0], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(at_threshold[1], 0.5, epsilon = 1e-6);
    assert_eq!(at_threshold[3], 1.0);

    let above_threshold = &pieces[2];
    assert_eq!(above_threshold.colors[1], B.packed());
}

#[test]
fn fade_zones_shrink_for_narrow_bands() {
    let band = HighlightBand::new(
        vec![0.0, 50.0, 54.0, 100.0],
        vec![A, B, C],
        DisplayMode::BackgroundFaded,
    )
    .expect("valid band");
    let builder = HighlightMeshBuilder::new(&band, ValueRange::default());
    let pieces = builder.background_pieces();
    for pair in pieces.windows(2) {
        assert!(pair[0].y_high <= pair[1].y_low + 1e-6);
        assert!(pair[0].y_low < pair[0].y_high);
    }
}

#[test]
fn underline_mesh_from_points_is_valid() {
    let builder = builder(DisplayMode::UnderlineFaded);
    let points = vec![
        DataPoint::new(0, 10.0),
        DataPoint::new(500, 90.0),
        DataPoint::new(1_000, 40.0),
    ];
    let mesh = builder
        .build(&points, TimeWindow::new(0, 1_000))
        .expect("mesh");
    assert!(!mesh.is_empty());
    mesh.validate().expect("valid mesh");
    assert!(mesh.colors.chunks_exact(4).all(|rgba| rgba[3] == 1.0));
}

#[test]
fn collapsed_window_builds_empty_mesh() {
    let builder = builder(DisplayMode::Underline);
    let mesh = builder
        .build(&[DataPoint::new(0, 10.0)], TimeWindow::empty())
        .expect("mesh");
    assert!(mesh.is_empty());
}

#[test]
fn mesh_beyond_u16_index_space_is_rejected() {
    let piece = builder(DisplayMode::Background).background_pieces()[0].clone();

    let at_limit = flatten_pieces(&vec![piece.clone(); 16_384]).expect("fits");
    assert_eq!(at_limit.indices.iter().max().copied(), Some(u16::MAX));

    let err = flatten_pieces(&vec![piece; 16_385]).expect_err("too large");
    assert!(matches!(err, GraphError::MeshTooLarge { vertices: 65_540 }));
}
