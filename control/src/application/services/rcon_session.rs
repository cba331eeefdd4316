//! Remote console: single command execution.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use crate::application::ports::CommandBridge;
use crate::application::services::bridge_client::BridgeClient;
use crate::domain::{RconError, RconState};

/// Clears `executing` when a command ends, including when its future is
/// dropped before the host answers.
struct Executing<'a>(&'a Mutex<RconState>);

impl Drop for Executing<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).executing = false;
    }
}

pub struct RconSession<B> {
    client: Arc<BridgeClient<B>>,
    state: Mutex<RconState>,
}

impl<B: CommandBridge> RconSession<B> {
    #[must_use]
    pub fn new(client: Arc<BridgeClient<B>>) -> Self {
        Self {
            client,
            state: Mutex::new(RconState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RconState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> RconState {
        *self.lock()
    }

    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.lock().executing
    }

    /// Send `command` to the remote console of the running instance.
    ///
    /// # Errors
    ///
    /// `RconError::EmptyCommand` before any host contact, or the host
    /// failure, which sets `failed`.
    pub async fn execute(&self, command: &str) -> Result<()> {
        if command.is_empty() {
            return Err(RconError::EmptyCommand.into());
        }
        self.lock().begin();
        let _executing = Executing(&self.state);
        let result = self.client.execute_rcon(command).await;
        self.lock().finish(result.is_ok());
        if let Err(err) = result {
            tracing::error!(error = %err, "failed to execute rcon command");
            return Err(err.into());
        }
        Ok(())
    }
}
