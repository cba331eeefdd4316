//! Domain types for hostctl configuration.
//!
//! Pure types only, no I/O.

use hostctl_common::BridgeConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `~/.hostctl/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Where the host command bridge listens.
    pub bridge: BridgeConfig,
    /// Diagnostic logging.
    pub log: LogConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
