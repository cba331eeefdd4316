//! Command vocabulary understood by the host bridge.

use serde::{Deserialize, Serialize};

/// A request name the host answers on the command bridge.
///
/// The serialized form is the exact string the host registers the handler
/// under, so the vocabulary is versioned together with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostCommand {
    LoadSettings,
    UpdateSettings,
    MaximizeWindow,
    FileExists,
    OpenInBrowser,
    IsInstanceStarted,
    StartInstances,
    StopInstances,
    #[serde(rename = "is_restapi_started")]
    IsRestApiStarted,
    IsPortAvailable,
    #[serde(rename = "start_restapi")]
    StartRestApi,
    #[serde(rename = "stop_restapi")]
    StopRestApi,
    ExecuteRcon,
    LoadScriptsInDirectory,
    LoadScript,
    SaveScript,
    ExecuteCode,
    ExecuteScript,
}

impl HostCommand {
    /// Every command, in vocabulary order.
    pub const ALL: [HostCommand; 18] = [
        HostCommand::LoadSettings,
        HostCommand::UpdateSettings,
        HostCommand::MaximizeWindow,
        HostCommand::FileExists,
        HostCommand::OpenInBrowser,
        HostCommand::IsInstanceStarted,
        HostCommand::StartInstances,
        HostCommand::StopInstances,
        HostCommand::IsRestApiStarted,
        HostCommand::IsPortAvailable,
        HostCommand::StartRestApi,
        HostCommand::StopRestApi,
        HostCommand::ExecuteRcon,
        HostCommand::LoadScriptsInDirectory,
        HostCommand::LoadScript,
        HostCommand::SaveScript,
        HostCommand::ExecuteCode,
        HostCommand::ExecuteScript,
    ];

    /// Wire name of the command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HostCommand::LoadSettings => "load_settings",
            HostCommand::UpdateSettings => "update_settings",
            HostCommand::MaximizeWindow => "maximize_window",
            HostCommand::FileExists => "file_exists",
            HostCommand::OpenInBrowser => "open_in_browser",
            HostCommand::IsInstanceStarted => "is_instance_started",
            HostCommand::StartInstances => "start_instances",
            HostCommand::StopInstances => "stop_instances",
            HostCommand::IsRestApiStarted => "is_restapi_started",
            HostCommand::IsPortAvailable => "is_port_available",
            HostCommand::StartRestApi => "start_restapi",
            HostCommand::StopRestApi => "stop_restapi",
            HostCommand::ExecuteRcon => "execute_rcon",
            HostCommand::LoadScriptsInDirectory => "load_scripts_in_directory",
            HostCommand::LoadScript => "load_script",
            HostCommand::SaveScript => "save_script",
            HostCommand::ExecuteCode => "execute_code",
            HostCommand::ExecuteScript => "execute_script",
        }
    }
}

impl std::fmt::Display for HostCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
