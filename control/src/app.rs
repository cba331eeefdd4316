//! Application context: every stateful component, wired once.
//!
//! `AppContext` is constructed at process start and handed to whatever
//! drives the control surface. It owns the bridge client, the shared
//! settings snapshot, both lifecycle machines and the two sessions; the
//! settings store receives the REST service machine it coordinates at
//! construction.

use std::sync::Arc;

use anyhow::{Context, Result};
use hostctl_common::AppSettings;

use crate::application::ports::{CommandBridge, ConfigStore};
use crate::application::services::{
    BridgeClient, InstanceMachine, RconSession, ScriptSession, ServiceMachine, SettingsStore,
    SharedSettings,
};
use crate::domain::{ControlConfig, StartOutcome};
use crate::infra::{HttpBridge, logging};

/// What `bootstrap` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub settings: AppSettings,
    /// The host was already running the instances.
    pub instances_running: bool,
    /// The host was already running the REST service.
    pub service_running: bool,
    /// Result of starting the instances because autostart is enabled.
    pub instances_autostart: Option<StartOutcome>,
    /// Result of starting the REST service because it is enabled.
    pub service_autostart: Option<StartOutcome>,
}

/// Unified application context.
pub struct AppContext<B> {
    pub client: Arc<BridgeClient<B>>,
    pub settings: SettingsStore<B>,
    pub instances: Arc<InstanceMachine<B>>,
    pub service: Arc<ServiceMachine<B>>,
    pub scripts: ScriptSession<B>,
    pub rcon: RconSession<B>,
}

impl<B: CommandBridge + 'static> AppContext<B> {
    /// Wire every component over `bridge`.
    #[must_use]
    pub fn new(bridge: B) -> Self {
        let client = Arc::new(BridgeClient::new(bridge));
        let shared = SharedSettings::default();
        let instances = Arc::new(InstanceMachine::new(Arc::clone(&client), shared.clone()));
        let service = Arc::new(ServiceMachine::new(Arc::clone(&client), shared.clone()));
        let settings = SettingsStore::new(Arc::clone(&client), shared, Arc::clone(&service));
        Self {
            scripts: ScriptSession::new(Arc::clone(&client)),
            rcon: RconSession::new(Arc::clone(&client)),
            client,
            settings,
            instances,
            service,
        }
    }

    /// Bring the in-memory state in line with the host.
    ///
    /// Loads settings, asks the host what is already running, then starts
    /// the REST service if it is enabled and the instances if autostart is
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns the first failure; later steps are skipped.
    pub async fn bootstrap(&self) -> Result<BootstrapReport> {
        let settings = self.settings.load().await.context("loading settings")?;
        let instances_running = self
            .instances
            .refresh()
            .await
            .context("probing instance status")?;
        let service_running = self
            .service
            .refresh()
            .await
            .context("probing rest api status")?;

        let service_autostart = if settings.gui.service_enabled && !service_running {
            Some(self.service.start().await?)
        } else {
            None
        };
        let instances_autostart = if settings.gui.autostart_enabled && !instances_running {
            Some(self.instances.start().await?)
        } else {
            None
        };

        tracing::info!(instances_running, service_running, "control surface ready");
        Ok(BootstrapReport {
            settings,
            instances_running,
            service_running,
            instances_autostart,
            service_autostart,
        })
    }
}

impl AppContext<HttpBridge> {
    /// Start-up path: load the configuration from `store`, install logging
    /// as it asks, then connect to the configured host endpoint.
    ///
    /// # Errors
    ///
    /// Returns the store failure, or the `connect` failure.
    pub fn from_store(store: &impl ConfigStore) -> Result<Self> {
        let config = store.load().context("loading control config")?;
        logging::init(&config.log);
        if let Ok(path) = store.path() {
            tracing::debug!(path = %path.display(), "control config loaded");
        }
        Self::connect(&config)
    }

    /// Build a context talking to the host endpoint named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn connect(config: &ControlConfig) -> Result<Self> {
        let bridge = HttpBridge::from_config(&config.bridge)?;
        tracing::debug!(endpoint = %bridge.base_url(), "command bridge configured");
        Ok(Self::new(bridge))
    }
}
