use super::types::RelayConfig;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "WEBCASTER_RELAY_CONFIG";

/// Config file used when neither `--config` nor [`CONFIG_ENV`] is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/webcaster-relay/config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the resolved path
    pub fn load(explicit: Option<&Path>) -> Result<RelayConfig> {
        Self::load_from_path(&Self::config_path(explicit))
    }

    /// Resolve the config path: `--config`, then the environment, then the default
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        Self::resolve_path(explicit, std::env::var_os(CONFIG_ENV))
    }

    fn resolve_path(explicit: Option<&Path>, env: Option<OsString>) -> PathBuf {
        match (explicit, env) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<RelayConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(RelayConfig::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }
}
