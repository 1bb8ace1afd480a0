use proptest::prelude::*;
use timegraph::api::{
    DataProvider, FetchBackend, FetchRange, GraphEngine, GraphEngineConfig, RefreshStatus,
};
use timegraph::core::{DataPoint, TimeWindow, Viewport};
use timegraph::error::GraphResult;
use timegraph::render::NullRenderer;

struct Replay(Vec<DataPoint>);

impl DataProvider for Replay {
    fn fetch(&mut self, _range: FetchRange) -> GraphResult<Vec<DataPoint>> {
        Ok(self.0.clone())
    }
}

fn engine(points: Vec<DataPoint>) -> GraphEngine<NullRenderer> {
    let config = GraphEngineConfig::new(Viewport::new(1200, 700), TimeWindow::new(-1_000, 1_000))
        .with_animate_refresh(false)
        .with_fetch_backend(FetchBackend::Inline);
    GraphEngine::new(NullRenderer::default(), Replay(points), config).expect("engine init")
}

fn canonicalize_points_contract(mut points: Vec<DataPoint>) -> Vec<DataPoint> {
    points.sort_by_key(|point| point.timestamp);

    let mut deduped: Vec<DataPoint> = Vec::with_capacity(points.len());
    for point in points {
        if let Some(last) = deduped.last_mut() {
            if point.timestamp == last.timestamp {
                *last = point;
                continue;
            }
        }
        deduped.push(point);
    }
    deduped
}

fn point_value_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -10_000.0f64..10_000.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    #[test]
    fn refreshed_points_are_sorted_and_unique(
        raw in proptest::collection::vec((-1_500i64..1_500, -10_000.0f64..10_000.0), 0..128)
    ) {
        let points: Vec<DataPoint> = raw
            .into_iter()
            .map(|(timestamp, value)| DataPoint::new(timestamp, value))
            .collect();
        let expected = canonicalize_points_contract(points.clone());

        let mut engine = engine(points);
        engine.refresh().expect("refresh");
        let status = engine.poll_refresh().expect("poll");

        if expected.is_empty() {
            prop_assert_eq!(status, RefreshStatus::NoData);
        } else {
            prop_assert_eq!(status, RefreshStatus::Ready);
        }
        prop_assert_eq!(engine.points(), expected.as_slice());
        prop_assert_eq!(engine.line_strip().vertex_count(), expected.len());
    }

    #[test]
    fn non_finite_values_reject_the_whole_fetch(
        raw in proptest::collection::vec((-1_000i64..1_000, point_value_strategy()), 1..64)
    ) {
        let points: Vec<DataPoint> = raw
            .into_iter()
            .map(|(timestamp, value)| DataPoint::new(timestamp, value))
            .collect();
        let poisoned = points.iter().any(|point| !point.value.is_finite());

        let mut engine = engine(points);
        engine.refresh().expect("refresh");
        let result = engine.poll_refresh();

        if poisoned {
            prop_assert!(result.is_err());
            prop_assert_eq!(engine.refresh_status(), RefreshStatus::Failed);
            prop_assert!(engine.points().is_empty());
        } else {
            prop_assert_eq!(result.expect("poll"), RefreshStatus::Ready);
        }
    }
}

