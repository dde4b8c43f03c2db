//! Tracing setup for applications embedding `plot-rs`.
//!
//! Renderers only emit `tracing` events: `debug` per axis, series, legend and
//! render pass, `trace` for tick computation, skipped markers, cache
//! evictions and clipped-away primitives. Installing a subscriber is left to
//! the host; `init_tracing_with_filter` is a shortcut behind the `telemetry`
//! feature.

/// Filter used when `RUST_LOG` is unset: warnings everywhere, render
/// summaries from this crate.
pub const DEFAULT_TRACING_FILTER: &str = "warn,plot_rs=debug";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_TRACING_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_TRACING_FILTER)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback filter. An
/// unparsable `default_filter` falls back to [`DEFAULT_TRACING_FILTER`].
#[must_use]
pub fn init_tracing_with_filter(default_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(default_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACING_FILTER))
        });
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = default_filter;
        false
    }
}
