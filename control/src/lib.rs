//! hostctl library: lifecycle orchestration over the host command bridge.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod domain;
pub mod infra;
