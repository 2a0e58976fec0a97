use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::{
    Units,
    geocode::google,
    http::ServiceSettings,
    provider::darksky,
};

/// Environment variable holding the Dark Sky key.
pub const FORECAST_KEY_ENV: &str = "DARKSKY_API_KEY";

/// Environment variable holding the (optional) Google Maps key.
pub const GEOCODE_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Settings for one remote API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the public endpoint, e.g. for a local stub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// units = "si"
///
/// [forecast]
/// api_key = "..."
///
/// [geocode]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default unit system when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,

    #[serde(default)]
    pub forecast: ServiceConfig,

    #[serde(default)]
    pub geocode: ServiceConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("net", "darksky", "darksky-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Dark Sky key: the environment wins over the file.
    pub fn forecast_api_key(&self, env: EnvLookup) -> Option<String> {
        env_key(env, FORECAST_KEY_ENV).or_else(|| non_empty(&self.forecast.api_key))
    }

    pub fn geocode_api_key(&self, env: EnvLookup) -> Option<String> {
        env_key(env, GEOCODE_KEY_ENV).or_else(|| non_empty(&self.geocode.api_key))
    }

    /// Connection settings for the forecast API. `None` when no key is available.
    pub fn forecast_settings(&self, timeout: Duration, env: EnvLookup) -> Option<ServiceSettings> {
        let key = self.forecast_api_key(env)?;
        let base = self.forecast.base_url.as_deref().unwrap_or(darksky::DEFAULT_BASE_URL);
        Some(ServiceSettings::new(base).with_api_key(key).with_timeout(timeout))
    }

    pub fn geocode_settings(&self, timeout: Duration, env: EnvLookup) -> ServiceSettings {
        let base = self.geocode.base_url.as_deref().unwrap_or(google::DEFAULT_BASE_URL);
        let settings = ServiceSettings::new(base).with_timeout(timeout);
        match self.geocode_api_key(env) {
            Some(key) => settings.with_api_key(key),
            None => settings,
        }
    }
}

/// Source of environment variables; [`process_env`] outside of tests.
pub type EnvLookup = fn(&str) -> Option<String>;

pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_key(env: EnvLookup, name: &str) -> Option<String> {
    env(name).filter(|v| !v.trim().is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}
