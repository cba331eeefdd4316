//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `hostctl_common`.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use hostctl_common::HostCommand;
use serde_json::Value;

use crate::domain::{BridgeError, ControlConfig};

// ── Command Bridge Port ───────────────────────────────────────────────────────

/// One request/response round trip to the host.
///
/// Implementations must not retry, queue or time out: every call is
/// at-most-once from the caller's side, and the host may have applied part
/// of a side effect before rejecting. The returned future is `Send` so
/// fire-and-forget calls can be spawned onto the runtime.
pub trait CommandBridge: Send + Sync {
    /// Issue `command` with the JSON argument object `args`.
    ///
    /// # Errors
    ///
    /// `BridgeError::Rejected` carries the host's message when the host
    /// reported a failure; `Unreachable` when the host could not be reached.
    fn call(
        &self,
        command: HostCommand,
        args: Value,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts where the control configuration lives.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when none exists.
    fn load(&self) -> Result<ControlConfig>;
    /// Persist the given configuration.
    fn save(&self, config: &ControlConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
