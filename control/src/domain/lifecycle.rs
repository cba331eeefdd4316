//! Lifecycle state of a host-managed resource.

use serde::Serialize;

/// Phase of a managed resource.
///
/// `Idle` and `Started` are rest states, `Starting` and `Stopping` mark a
/// host call in flight. `Failed` is not terminal: a new start or stop
/// request leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Starting,
    Started,
    Stopping,
    Failed,
}

impl Phase {
    /// `Starting` or `Started`: the resource is up or coming up.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Starting | Phase::Started)
    }

    /// A host call is in flight for this resource.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Phase::Starting | Phase::Stopping)
    }

    /// Phase implied by a host status answer.
    #[must_use]
    pub fn from_status(started: bool) -> Self {
        if started { Phase::Started } else { Phase::Idle }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Starting => "starting",
            Phase::Started => "started",
            Phase::Stopping => "stopping",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Observable state of one lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleState {
    pub phase: Phase,
    /// Result of the last port check. Always `true` for resources that do
    /// not check a port before starting.
    pub port_available: bool,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            port_available: true,
        }
    }
}

/// How a start request that was not refused ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The host started the resource.
    Started,
    /// The pre-start check found the port taken; nothing was attempted.
    PortUnavailable,
}
