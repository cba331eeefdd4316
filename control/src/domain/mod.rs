//! Domain layer: pure types, state records and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs` or `std::net`. All functions are synchronous and take
//! data in, returning data out.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod rcon;
pub mod script;
pub mod settings;

pub use config::{ControlConfig, LogConfig};
pub use error::{BridgeError, LifecycleError, RconError, ScriptError};
pub use lifecycle::{LifecycleState, Phase, StartOutcome};
pub use rcon::RconState;
pub use script::{ScriptSessionState, language_from_path};
pub use settings::SettingChange;
