//! Tracing setup for the proclock binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to whatever application embeds the library).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `proclock=debug`).
pub const LOG_ENV: &str = "PROCLOCK_LOG";

/// Filter used when `PROCLOCK_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `PROCLOCK_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a stderr fmt subscriber.
///
/// Output goes to stderr so it never mixes with command output on stdout.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
