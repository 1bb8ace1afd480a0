use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timegraph::api::{LabelGranularity, TimeAxisLabelConfig, TimeAxisLabeler, resolve_pan};
use timegraph::core::{
    DataExtent, DataPoint, TimeWindow, ValueAxisOrientation, ValueRange, project_line_strip,
};
use timegraph::render::{BandColor, DisplayMode, HighlightBand, HighlightMeshBuilder};

fn wave(count: i64) -> Vec<DataPoint> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            DataPoint::new(i * 60_000, 50.0 + 45.0 * (t * 0.01).sin())
        })
        .collect()
}

fn bench_line_strip_projection_10k(c: &mut Criterion) {
    let points = wave(10_000);
    let window = TimeWindow::new(0, 10_000 * 60_000);

    c.bench_function("line_strip_projection_10k", |b| {
        b.iter(|| {
            let _ = project_line_strip(
                black_box(&points),
                black_box(window),
                black_box(ValueRange::default()),
                black_box(ValueAxisOrientation::Upward),
            )
            .expect("projection should succeed");
        })
    });
}

fn bench_underline_faded_mesh_500(c: &mut Criterion) {
    let points = wave(500);
    let window = TimeWindow::new(0, 500 * 60_000);
    let band = HighlightBand::new(
        vec![0.0, 25.0, 50.0, 75.0, 100.0],
        vec![
            BandColor::rgb(0, 90, 0),
            BandColor::rgb(90, 90, 0),
            BandColor::rgb(120, 60, 0),
            BandColor::rgb(127, 0, 0),
        ],
        DisplayMode::UnderlineFaded,
    )
    .expect("valid band");
    let builder = HighlightMeshBuilder::new(&band, ValueRange::default());

    c.bench_function("underline_faded_mesh_500", |b| {
        b.iter(|| {
            let _ = builder
                .build(black_box(&points), black_box(window))
                .expect("mesh should fit");
        })
    });
}

fn bench_hour_labels_10k(c: &mut Criterion) {
    let points = wave(10_000);
    let labeler = TimeAxisLabeler::new(&TimeAxisLabelConfig::new(LabelGranularity::Hour))
        .expect("valid labeler");

    c.bench_function("hour_labels_10k", |b| {
        b.iter(|| {
            let _ = labeler.label_points(black_box(&points));
        })
    });
}

fn bench_pan_resolution(c: &mut Criterion) {
    let extent = DataExtent {
        first: DataPoint::new(0, 0.0),
        last: DataPoint::new(86_400_000, 0.0),
    };
    let window = TimeWindow::new(40_000_000, 43_600_000);

    c.bench_function("pan_resolution", |b| {
        b.iter(|| {
            let _ = resolve_pan(black_box(window), black_box(extent), black_box(0.137));
        })
    });
}

criterion_group!(
    benches,
    bench_line_strip_projection_10k,
    bench_underline_faded_mesh_500,
    bench_hour_labels_10k,
    bench_pan_resolution
);
criterion_main!(benches);
