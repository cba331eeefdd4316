//! Infrastructure implementation of the `CommandBridge` port over HTTP.
//!
//! Each command is a `POST {endpoint}/invoke/{command}` carrying the JSON
//! argument object. A 2xx reply carries the JSON result (an empty body means
//! `null`); any other status is a rejection whose body is the host's
//! message. The client has no request timeout: a slow host call simply
//! keeps its caller waiting.

use anyhow::{Context, Result};
use hostctl_common::{BridgeConfig, HostCommand};
use reqwest::Client;
use serde_json::Value;

use crate::application::ports::CommandBridge;
use crate::domain::BridgeError;

/// Production `CommandBridge` talking to the host's local HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    http: Client,
    base_url: String,
}

impl HttpBridge {
    /// Build a bridge for `endpoint`, e.g. `http://127.0.0.1:7123`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("building http client for the command bridge")?;
        Ok(Self {
            http,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        Self::new(&config.endpoint)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, command: HostCommand) -> String {
        format!("{}/invoke/{}", self.base_url, command.as_str())
    }
}

/// Extract the host's message from a rejection body.
///
/// Hosts reply either with a bare text message or with a JSON string.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        _ => body.trim().to_string(),
    }
}

impl CommandBridge for HttpBridge {
    async fn call(&self, command: HostCommand, args: Value) -> Result<Value, BridgeError> {
        let resp = self
            .http
            .post(self.url(command))
            .json(&args)
            .send()
            .await
            .map_err(|e| BridgeError::Unreachable(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BridgeError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(BridgeError::Rejected(rejection_message(&body)));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| BridgeError::Decode {
            command: command.as_str(),
            message: e.to_string(),
        })
    }
}
