pub mod commands;
pub mod config;
pub mod settings;
pub mod types;

pub use commands::HostCommand;
pub use config::BridgeConfig;
pub use settings::{AppSettings, GuiSettings, ResourceSettings, ServiceSettings};
pub use types::{ScriptOutput, ScriptTreeNode};
