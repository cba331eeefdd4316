//! Settings snapshot exchanged with the host.
//!
//! Field names on the Rust side describe what a setting does; the serde
//! attributes keep the host's original key names on the wire.

use serde::{Deserialize, Serialize};

/// The full persisted settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub gui: GuiSettings,
    #[serde(rename = "restapi")]
    pub service: ServiceSettings,
    #[serde(rename = "factorio")]
    pub resource: ResourceSettings,
}

/// Behaviour of the control surface itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiSettings {
    /// Start the worker instances when the control surface comes up.
    #[serde(rename = "enable_autostart")]
    pub autostart_enabled: bool,
    /// Keep the embedded REST service running.
    #[serde(rename = "enable_restapi")]
    pub service_enabled: bool,
}

/// Embedded REST service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub port: u16,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVICE_PORT,
        }
    }
}

/// Default port of the embedded REST service.
pub const DEFAULT_SERVICE_PORT: u16 = 7123;

/// Default remote-console port of the first worker instance.
pub const DEFAULT_RCON_PORT: u16 = 1234;

/// Worker instance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    pub client_count: u32,
    #[serde(rename = "factorio_archive_path")]
    pub archive_path: String,
    pub map_exchange_string: String,
    #[serde(rename = "rcon_pass")]
    pub rcon_password: String,
    pub rcon_port: u16,
    #[serde(rename = "recreate")]
    pub recreate_workspace: bool,
    #[serde(rename = "restapi_port")]
    pub service_port: u16,
    pub seed: String,
    pub workspace_path: String,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            client_count: 1,
            archive_path: String::new(),
            map_exchange_string: String::new(),
            rcon_password: String::new(),
            rcon_port: DEFAULT_RCON_PORT,
            recreate_workspace: false,
            service_port: DEFAULT_SERVICE_PORT,
            seed: String::new(),
            workspace_path: String::new(),
        }
    }
}
