//! Subscriber setup for the `timegraph` log target.
//!
//! At `warn` the engine reports failed refreshes, dropped highlight layers
//! and provider panics. `debug` adds geometry rebuilds, clears, edge pins,
//! coalesced and superseded fetches. `trace` logs every pan and zoom step
//! along with the fetch range handed to the provider.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `timegraph=info`. Needs the `telemetry` feature.
///
/// `false` means nothing was installed: the feature is off or the host
/// already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timegraph=info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
