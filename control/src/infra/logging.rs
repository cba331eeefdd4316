//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

use crate::domain::LogConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter. Returns `false` when a
/// subscriber was already installed, which is harmless.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
