//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. Callers that need to tell a
//! precondition violation from a host rejection downcast to these types.

use thiserror::Error;

use crate::domain::lifecycle::Phase;

// ── Bridge errors ─────────────────────────────────────────────────────────────

/// Failure of a single command bridge round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The host handled the request and reported a failure. The message is
    /// the host's own, shown verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("host unreachable: {0}")]
    Unreachable(String),

    #[error("unexpected reply to {command}: {message}")]
    Decode {
        command: &'static str,
        message: String,
    },
}

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Start/stop requests refused before the host is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{resource} already started")]
    AlreadyStarted { resource: &'static str },

    #[error("{resource} not started")]
    NotStarted { resource: &'static str },

    #[error("{resource} is busy ({phase})")]
    Busy {
        resource: &'static str,
        phase: Phase,
    },

    #[error("please set the archive path under settings first")]
    MissingArchivePath,
}

// ── Script errors ─────────────────────────────────────────────────────────────

/// Script session requests refused before the host is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("no code to execute")]
    NoCode,

    #[error("no script to execute")]
    NoActiveScript,

    #[error("a script is already executing")]
    AlreadyExecuting,
}

// ── Remote console errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RconError {
    #[error("no command to execute")]
    EmptyCommand,
}
