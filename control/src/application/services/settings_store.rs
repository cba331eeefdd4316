//! Settings store: the single in-memory settings snapshot and its mutators.
//!
//! Every mutator writes one field in memory and then sends the whole
//! snapshot to the host. The in-memory write is never rolled back when the
//! send fails. Mutations that touch the REST service are coordinated with the
//! injected service machine: stop before the write, start after the send.

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use hostctl_common::AppSettings;

use crate::application::ports::CommandBridge;
use crate::application::services::bridge_client::BridgeClient;
use crate::application::services::lifecycle::ServiceMachine;
use crate::domain::SettingChange;

// ── Shared snapshot ───────────────────────────────────────────────────────────

/// Read-only handle on the settings snapshot.
///
/// Cloned into every component that needs to read settings. Only the
/// [`SettingsStore`] can write through it.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Option<AppSettings>>>,
}

impl SharedSettings {
    /// A copy of the current snapshot, `None` before the first load.
    #[must_use]
    pub fn snapshot(&self) -> Option<AppSettings> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read one value out of the snapshot without cloning it whole.
    pub fn read<T>(&self, f: impl FnOnce(&AppSettings) -> T) -> Option<T> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(f)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    fn replace(&self, settings: AppSettings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(settings);
    }

    fn update<T>(&self, f: impl FnOnce(&mut AppSettings) -> T) -> Option<T> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
            .map(f)
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Owner of the persisted settings snapshot.
pub struct SettingsStore<B> {
    client: Arc<BridgeClient<B>>,
    settings: SharedSettings,
    service: Arc<ServiceMachine<B>>,
}

impl<B: CommandBridge> SettingsStore<B> {
    /// Build a store writing through `settings` and coordinating `service`.
    ///
    /// `settings` must be the same handle the machines were given.
    #[must_use]
    pub fn new(
        client: Arc<BridgeClient<B>>,
        settings: SharedSettings,
        service: Arc<ServiceMachine<B>>,
    ) -> Self {
        Self {
            client,
            settings,
            service,
        }
    }

    /// Read-only handle for other components.
    #[must_use]
    pub fn shared(&self) -> SharedSettings {
        self.settings.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<AppSettings> {
        self.settings.snapshot()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.settings.is_loaded()
    }

    #[must_use]
    pub fn autostart_enabled(&self) -> Option<bool> {
        self.settings.read(|s| s.gui.autostart_enabled)
    }

    #[must_use]
    pub fn service_enabled(&self) -> Option<bool> {
        self.settings.read(|s| s.gui.service_enabled)
    }

    #[must_use]
    pub fn service_port(&self) -> Option<u16> {
        self.settings.read(|s| s.service.port)
    }

    #[must_use]
    pub fn client_count(&self) -> Option<u32> {
        self.settings.read(|s| s.resource.client_count)
    }

    #[must_use]
    pub fn archive_path(&self) -> Option<String> {
        self.settings.read(|s| s.resource.archive_path.clone())
    }

    #[must_use]
    pub fn map_exchange_string(&self) -> Option<String> {
        self.settings.read(|s| s.resource.map_exchange_string.clone())
    }

    #[must_use]
    pub fn recreate_workspace(&self) -> Option<bool> {
        self.settings.read(|s| s.resource.recreate_workspace)
    }

    #[must_use]
    pub fn seed(&self) -> Option<String> {
        self.settings.read(|s| s.resource.seed.clone())
    }

    #[must_use]
    pub fn workspace_path(&self) -> Option<String> {
        self.settings.read(|s| s.resource.workspace_path.clone())
    }

    /// Fetch the snapshot from the host, replacing the in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns the host failure; the previous snapshot is kept in that case.
    pub async fn load(&self) -> Result<AppSettings> {
        let settings = self.client.load_settings().await?;
        self.settings.replace(settings.clone());
        tracing::info!(service_port = settings.service.port, "settings loaded");
        Ok(settings)
    }

    /// Maximize the host window. The host answers with its current settings,
    /// which replace the in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns the host failure.
    pub async fn maximize_window(&self) -> Result<AppSettings> {
        let settings = self.client.maximize_window().await?;
        self.settings.replace(settings.clone());
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns the host failure.
    pub async fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.client.file_exists(path).await?)
    }

    /// # Errors
    ///
    /// Returns the host failure.
    pub async fn open_in_browser(&self, url: &str) -> Result<()> {
        Ok(self.client.open_in_browser(url).await?)
    }

    /// Send the entire current snapshot to the host. No-op before a load.
    ///
    /// # Errors
    ///
    /// Returns the host failure. The in-memory snapshot is left as is.
    pub async fn persist(&self) -> Result<()> {
        let Some(snapshot) = self.settings.snapshot() else {
            return Ok(());
        };
        if let Err(err) = self.client.update_settings(&snapshot).await {
            tracing::error!(error = %err, "failed to persist settings");
            return Err(err.into());
        }
        Ok(())
    }

    /// Apply a single-field change and persist.
    ///
    /// Changes to the REST service flag or port are routed through
    /// [`set_service_enabled`](Self::set_service_enabled) and
    /// [`set_service_port`](Self::set_service_port). Does nothing before a
    /// load.
    ///
    /// # Errors
    ///
    /// Returns a service start/stop failure or the persistence failure.
    pub async fn mutate(&self, change: SettingChange) -> Result<()> {
        match change {
            SettingChange::ServiceEnabled(enabled) => self.set_service_enabled(enabled).await,
            SettingChange::ServicePort(port) => self.set_service_port(port).await,
            change => {
                let key = change.key();
                if self.settings.update(|s| change.apply(s)).is_none() {
                    tracing::debug!(key, "settings not loaded; ignoring change");
                    return Ok(());
                }
                tracing::info!(key, "setting updated");
                self.persist().await
            }
        }
    }

    /// Enable or disable the REST service.
    ///
    /// Disabling stops a running service before the flag is written.
    /// Enabling writes and persists the flag, then starts the service.
    ///
    /// # Errors
    ///
    /// A stop failure aborts the change before anything is written. A start
    /// failure is returned after the flag has been persisted.
    pub async fn set_service_enabled(&self, enabled: bool) -> Result<()> {
        let Some(was_enabled) = self.settings.read(|s| s.gui.service_enabled) else {
            tracing::debug!("settings not loaded; ignoring service toggle");
            return Ok(());
        };

        if was_enabled && !enabled && self.service.phase().is_running() {
            self.service.stop().await?;
        }

        self.settings.update(|s| s.gui.service_enabled = enabled);
        tracing::info!(enabled, "rest api toggled");
        self.persist().await?;

        if !was_enabled && enabled && !self.service.phase().is_running() {
            self.service.start().await?;
        }
        Ok(())
    }

    /// Change the REST service port.
    ///
    /// When the port actually changes, a running service is stopped first and
    /// started again on the new port once the snapshot has been persisted. A
    /// service that was not running is started too if the service is
    /// enabled. An unchanged port is only persisted.
    ///
    /// # Errors
    ///
    /// A stop failure aborts the change before anything is written. That
    /// includes `LifecycleError::Busy` while the service is still `Starting`.
    pub async fn set_service_port(&self, port: u16) -> Result<()> {
        let Some((prior, enabled)) = self
            .settings
            .read(|s| (s.service.port, s.gui.service_enabled))
        else {
            tracing::debug!("settings not loaded; ignoring port change");
            return Ok(());
        };

        let changed = prior != port;
        let was_running = self.service.phase().is_running();
        if changed && was_running {
            self.service.stop().await?;
        }

        self.settings.update(|s| s.service.port = port);
        tracing::info!(prior, port, "rest api port updated");
        self.persist().await?;

        if changed && (was_running || enabled) {
            self.service.start().await?;
        }
        Ok(())
    }
}
