//! Application services: use-case orchestration.
//!
//! Each service module owns one piece of state and composes domain logic
//! with calls through the typed bridge client. Services import only from
//! `crate::domain` and `crate::application::ports`.

pub mod bridge_client;
pub mod lifecycle;
pub mod rcon_session;
pub mod script_session;
pub mod settings_store;

pub use bridge_client::BridgeClient;
pub use lifecycle::{
    InstanceMachine, Instances, LifecycleMachine, ManagedResource, Preflight, RestApi,
    ServiceMachine,
};
pub use rcon_session::RconSession;
pub use script_session::ScriptSession;
pub use settings_store::{SettingsStore, SharedSettings};
