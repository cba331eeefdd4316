//! Single-field settings mutations.
//!
//! Pure functions only.

use hostctl_common::AppSettings;

/// One logical settings field together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    AutostartEnabled(bool),
    ServiceEnabled(bool),
    ServicePort(u16),
    ClientCount(u32),
    ArchivePath(String),
    MapExchangeString(String),
    RconPassword(String),
    RconPort(u16),
    RecreateWorkspace(bool),
    /// Port the worker instances hand to their own REST bridge.
    ResourceServicePort(u16),
    Seed(String),
    WorkspacePath(String),
}

impl SettingChange {
    /// Dotted wire path of the field, for diagnostics.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            SettingChange::AutostartEnabled(_) => "gui.enable_autostart",
            SettingChange::ServiceEnabled(_) => "gui.enable_restapi",
            SettingChange::ServicePort(_) => "restapi.port",
            SettingChange::ClientCount(_) => "factorio.client_count",
            SettingChange::ArchivePath(_) => "factorio.factorio_archive_path",
            SettingChange::MapExchangeString(_) => "factorio.map_exchange_string",
            SettingChange::RconPassword(_) => "factorio.rcon_pass",
            SettingChange::RconPort(_) => "factorio.rcon_port",
            SettingChange::RecreateWorkspace(_) => "factorio.recreate",
            SettingChange::ResourceServicePort(_) => "factorio.restapi_port",
            SettingChange::Seed(_) => "factorio.seed",
            SettingChange::WorkspacePath(_) => "factorio.workspace_path",
        }
    }

    /// Write the new value into `settings`, touching no other field.
    pub fn apply(self, settings: &mut AppSettings) {
        match self {
            SettingChange::AutostartEnabled(v) => settings.gui.autostart_enabled = v,
            SettingChange::ServiceEnabled(v) => settings.gui.service_enabled = v,
            SettingChange::ServicePort(v) => settings.service.port = v,
            SettingChange::ClientCount(v) => settings.resource.client_count = v,
            SettingChange::ArchivePath(v) => settings.resource.archive_path = v,
            SettingChange::MapExchangeString(v) => settings.resource.map_exchange_string = v,
            SettingChange::RconPassword(v) => settings.resource.rcon_password = v,
            SettingChange::RconPort(v) => settings.resource.rcon_port = v,
            SettingChange::RecreateWorkspace(v) => settings.resource.recreate_workspace = v,
            SettingChange::ResourceServicePort(v) => settings.resource.service_port = v,
            SettingChange::Seed(v) => settings.resource.seed = v,
            SettingChange::WorkspacePath(v) => settings.resource.workspace_path = v,
        }
    }
}
