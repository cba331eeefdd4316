//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` and `hostctl_common`, never
//! on `crate::infra`.

pub mod ports;
pub mod services;

pub use ports::{CommandBridge, ConfigStore};
