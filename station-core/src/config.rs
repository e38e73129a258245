use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::Coordinates,
    provider::{geocode::DEFAULT_GEO_BASE_URL, openweather::DEFAULT_WEATHER_BASE_URL},
};

/// Key value shipped in sample configs; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "your_openweathermap_api_key";

/// Environment variable that overrides the configured key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// quick_cities = ["London", "Tokyo"]
///
/// [location]
/// latitude = 52.52
/// longitude = 13.40
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. Absent means demo mode.
    pub api_key: Option<String>,
    pub geo_base_url: String,
    pub weather_base_url: String,
    /// Presets offered by quick-pick.
    pub quick_cities: Vec<String>,
    /// Simulated latency of demo data.
    pub demo_delay_ms: u64,
    /// When false, location requests are refused as if permission was denied.
    pub allow_location: bool,
    /// Fixed position used instead of an IP lookup.
    pub location: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            quick_cities: ["London", "New York", "Tokyo", "Paris", "Sydney"]
                .into_iter()
                .map(String::from)
                .collect(),
            demo_delay_ms: 1000,
            allow_location: true,
            location: None,
        }
    }
}

impl Config {
    /// Usable API key, ignoring empty values and the placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn is_demo(&self) -> bool {
        self.api_key().is_none()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Apply `OPENWEATHER_API_KEY` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
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
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-station", "station")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
