//! Log output of a running synchronization.
//!
//! Everything is emitted through `tracing` under the `chart_sync` target:
//! - `debug`: group created and waiting, each chart reporting ready, the group
//!   going live, detach (including detach while charts were still pending).
//! - `trace`: hook capture, every viewport applied or skipped as already in
//!   sync, every mirrored highlight and every x without a matching row.
//! - `warn`: a chart reporting ready after its group was detached.
//!
//! Hosts with their own subscriber need nothing from this module.

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "chart_sync=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
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
