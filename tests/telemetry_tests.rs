use timegraph::telemetry::init_default_tracing;

#[test]
fn tracing_installs_at_most_once() {
    let first = init_default_tracing();
    let second = init_default_tracing();

    assert!(!second);
    if cfg!(not(feature = "telemetry")) {
        assert!(!first);
    }
}
