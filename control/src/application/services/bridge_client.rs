//! Typed client over the command bridge port.
//!
//! One method per host command that takes arguments. The argument-less
//! status, start and stop commands go through `status` and `trigger`, keyed by
//! the lifecycle machines. Each call is a single round trip with no retries. Replies are decoded into typed values here so services never
//! handle raw JSON.

use hostctl_common::{AppSettings, HostCommand, ScriptOutput, ScriptTreeNode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::application::ports::CommandBridge;
use crate::domain::BridgeError;

/// Typed wrapper around a [`CommandBridge`].
pub struct BridgeClient<B> {
    bridge: B,
}

impl<B: CommandBridge> BridgeClient<B> {
    #[must_use]
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// The underlying transport.
    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        command: HostCommand,
        args: Value,
    ) -> Result<T, BridgeError> {
        tracing::debug!(%command, "bridge call");
        let reply = self.bridge.call(command, args).await?;
        serde_json::from_value(reply).map_err(|e| BridgeError::Decode {
            command: command.as_str(),
            message: e.to_string(),
        })
    }

    /// Issue a command whose reply carries no data. Whatever the host sends
    /// back is discarded.
    async fn invoke_unit(&self, command: HostCommand, args: Value) -> Result<(), BridgeError> {
        tracing::debug!(%command, "bridge call");
        self.bridge.call(command, args).await.map(|_| ())
    }

    /// Issue an argument-less command that answers with a boolean.
    ///
    /// # Errors
    ///
    /// Returns the bridge failure, or `Decode` if the reply is not a bool.
    pub async fn status(&self, command: HostCommand) -> Result<bool, BridgeError> {
        self.invoke(command, json!({})).await
    }

    /// Issue an argument-less command that answers with nothing.
    ///
    /// # Errors
    ///
    /// Returns the bridge failure.
    pub async fn trigger(&self, command: HostCommand) -> Result<(), BridgeError> {
        self.invoke_unit(command, json!({})).await
    }

    // ── Settings and window ──────────────────────────────────────────────────

    pub async fn load_settings(&self) -> Result<AppSettings, BridgeError> {
        self.invoke(HostCommand::LoadSettings, json!({})).await
    }

    pub async fn update_settings(&self, settings: &AppSettings) -> Result<(), BridgeError> {
        let settings = serde_json::to_value(settings).map_err(|e| BridgeError::Decode {
            command: HostCommand::UpdateSettings.as_str(),
            message: e.to_string(),
        })?;
        self.invoke_unit(HostCommand::UpdateSettings, json!({ "settings": settings }))
            .await
    }

    pub async fn maximize_window(&self) -> Result<AppSettings, BridgeError> {
        self.invoke(HostCommand::MaximizeWindow, json!({})).await
    }

    pub async fn file_exists(&self, path: &str) -> Result<bool, BridgeError> {
        self.invoke(HostCommand::FileExists, json!({ "path": path }))
            .await
    }

    pub async fn open_in_browser(&self, url: &str) -> Result<(), BridgeError> {
        self.invoke_unit(HostCommand::OpenInBrowser, json!({ "url": url }))
            .await
    }

    // ── REST service ─────────────────────────────────────────────────────────

    pub async fn is_port_available(&self, port: u16) -> Result<bool, BridgeError> {
        self.invoke(HostCommand::IsPortAvailable, json!({ "port": port }))
            .await
    }

    // ── Remote console ───────────────────────────────────────────────────────

    pub async fn execute_rcon(&self, command: &str) -> Result<(), BridgeError> {
        self.invoke_unit(HostCommand::ExecuteRcon, json!({ "command": command }))
            .await
    }

    // ── Scripts ──────────────────────────────────────────────────────────────

    pub async fn load_scripts_in_directory(
        &self,
        path: &str,
    ) -> Result<Vec<ScriptTreeNode>, BridgeError> {
        self.invoke(HostCommand::LoadScriptsInDirectory, json!({ "path": path }))
            .await
    }

    pub async fn load_script(&self, path: &str) -> Result<String, BridgeError> {
        self.invoke(HostCommand::LoadScript, json!({ "path": path }))
            .await
    }

    pub async fn save_script(&self, code: &str, path: &str) -> Result<(), BridgeError> {
        self.invoke_unit(HostCommand::SaveScript, json!({ "code": code, "path": path }))
            .await
    }

    pub async fn execute_code(
        &self,
        code: &str,
        language: &str,
    ) -> Result<ScriptOutput, BridgeError> {
        self.invoke(
            HostCommand::ExecuteCode,
            json!({ "code": code, "language": language }),
        )
        .await
    }

    pub async fn execute_script(&self, path: &str) -> Result<ScriptOutput, BridgeError> {
        self.invoke(HostCommand::ExecuteScript, json!({ "path": path }))
            .await
    }
}
