//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the HTTP command bridge,
//! configuration file access and logging setup.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod config;
pub mod http_bridge;
pub mod logging;

pub use config::YamlConfigStore;
pub use http_bridge::HttpBridge;
