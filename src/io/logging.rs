//! Tracing subscriber setup for the command-line binary

use crate::io::configuration::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber filtered by `RUST_LOG`
///
/// Falls back to the crate's default filter when `RUST_LOG` is unset or
/// invalid. `quiet` raises the fallback to warnings only. Calling this more
/// than once keeps the first subscriber.
pub fn init_logging(quiet: bool) {
    let fallback = if quiet { "towerwfc=warn" } else { DEFAULT_LOG_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
