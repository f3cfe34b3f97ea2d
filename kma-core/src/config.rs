use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::DEFAULT_NUM_OF_ROWS;

/// Village forecast endpoint of the public data portal.
pub const DEFAULT_ENDPOINT: &str =
    "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getVilageFcst";

/// Environment variable that overrides the stored service key.
pub const SERVICE_KEY_ENV: &str = "KMA_SERVICE_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// service_key = "..."
/// endpoint = "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getVilageFcst"
/// num_of_rows = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Decoded (not URL-encoded) service key from the data portal.
    pub service_key: Option<String>,

    /// Override for the forecast endpoint.
    pub endpoint: Option<String>,

    pub num_of_rows: Option<u32>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "kma-weather", "kma-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `KMA_SERVICE_KEY` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_service_key_override(std::env::var(SERVICE_KEY_ENV).ok())
    }

    /// Replace the stored key with `key` when it is present and non-blank.
    pub fn with_service_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.service_key = Some(key);
        }
        self
    }

    pub fn set_service_key(&mut self, key: String) {
        self.service_key = Some(key.trim().to_string());
    }

    /// Returns the service key, if present.
    pub fn service_key(&self) -> Option<&str> {
        self.service_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn num_of_rows(&self) -> u32 {
        self.num_of_rows.unwrap_or(DEFAULT_NUM_OF_ROWS)
    }

    pub fn is_configured(&self) -> bool {
        self.service_key().is_some()
    }
}
