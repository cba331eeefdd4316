use serde::{Deserialize, Serialize};

/// Endpoint the host exposes its command bridge on when none is configured.
pub const DEFAULT_BRIDGE_ENDPOINT: &str = "http://127.0.0.1:7123";

/// Command bridge connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the host bridge (default: http://127.0.0.1:7123)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_BRIDGE_ENDPOINT.to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}
