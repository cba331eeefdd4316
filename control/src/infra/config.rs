//! YAML file behind the `ConfigStore` port.
//!
//! The file is optional: a missing file means defaults. Writes go through a
//! sibling temporary file that is renamed into place, so a crash mid-write
//! never leaves a truncated config behind.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::application::ports::ConfigStore;
use crate::domain::ControlConfig;

/// Overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "HOSTCTL_CONFIG";

/// Overrides the configured bridge endpoint.
pub const BRIDGE_ENDPOINT_ENV: &str = "HOSTCTL_BRIDGE_ENDPOINT";

/// Control configuration kept as YAML on disk.
///
/// Without an explicit location the file is `$HOSTCTL_CONFIG`, or
/// `~/.hostctl/config.yaml` when that is unset.
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    location: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store at the default location.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pinned to `path`, ignoring `HOSTCTL_CONFIG`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Some(path.into()),
        }
    }

    fn read(path: &Path) -> Result<Option<ControlConfig>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read {}", path.display()));
            }
        };
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        Ok(Some(config))
    }
}

/// Environment settings that win over the file.
fn apply_env(config: &mut ControlConfig) {
    if let Ok(endpoint) = std::env::var(BRIDGE_ENDPOINT_ENV) {
        tracing::debug!(endpoint = %endpoint, "bridge endpoint taken from environment");
        config.bridge.endpoint = endpoint;
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ControlConfig> {
        let path = self.path()?;
        let mut config = Self::read(&path)?.unwrap_or_default();
        apply_env(&mut config);
        Ok(config)
    }

    fn save(&self, config: &ControlConfig) -> Result<()> {
        let path = self.path()?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

        let yaml = serde_yaml::to_string(config).context("cannot serialize config")?;
        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("cannot stage config in {}", dir.display()))?;
        staged
            .write_all(yaml.as_bytes())
            .context("cannot write staged config")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .context("cannot restrict staged config")?;
        }

        staged
            .persist(&path)
            .with_context(|| format!("cannot replace {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.location {
            return Ok(path.clone());
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(home.join(".hostctl").join("config.yaml"))
    }
}
