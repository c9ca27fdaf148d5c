use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    forecast::{DEFAULT_DAY_LIMIT, DEFAULT_HOURLY_WINDOW},
    model::Query,
    units::{TemperatureUnit, Units},
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Kashgar"
/// units = "metric"
/// display_unit = "celsius"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. [`API_KEY_ENV`] takes precedence when set.
    pub api_key: Option<String>,

    /// City used when no location is given on the command line.
    pub default_city: Option<String>,

    /// Unit system requested from the provider. Values are converted to
    /// Celsius on arrival regardless of this choice.
    pub units: Units,

    pub display_unit: TemperatureUnit,

    /// Hourly snapshots after the synthetic "Now" entry.
    pub hourly_window: usize,

    pub day_limit: usize,

    pub timeout_secs: u64,

    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: None,
            units: Units::default(),
            display_unit: TemperatureUnit::default(),
            hourly_window: DEFAULT_HOURLY_WINDOW,
            day_limit: DEFAULT_DAY_LIMIT,
            timeout_secs: 10,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
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
        self.save_to(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from [`API_KEY_ENV`], falling back to the config file.
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Pick between an environment-provided key and the stored one. Blank
    /// values count as unset.
    pub fn resolve_api_key(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Query for the configured default city.
    pub fn default_query(&self) -> Result<Query> {
        let city = self.default_city.as_deref().filter(|c| !c.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No location given and no default city configured.\n\
                 Hint: pass a city, use --lat/--lon, or run `skycast configure`."
            )
        })?;

        Ok(Query::city(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.hourly_window, 5);
        assert_eq!(cfg.day_limit, 5);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn env_key_wins_over_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.resolve_api_key(Some("ENV_KEY".into())).as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.resolve_api_key(None).as_deref(), Some("FILE_KEY"));
        assert_eq!(cfg.resolve_api_key(Some("  ".into())).as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn missing_key_resolves_to_none() {
        let cfg = Config::default();
        assert!(cfg.resolve_api_key(None).is_none());
    }

    #[test]
    fn default_query_errors_when_not_set() {
        let err = Config::default().default_query().unwrap_err();
        assert!(err.to_string().contains("no default city configured"));
    }

    #[test]
    fn default_query_uses_city() {
        let cfg = Config { default_city: Some("Kashgar".into()), ..Config::default() };
        assert_eq!(cfg.default_query().unwrap(), Query::city("Kashgar"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            default_city: Some("Lisbon".into()),
            units: Units::Imperial,
            display_unit: TemperatureUnit::Fahrenheit,
            day_limit: 3,
            ..Config::default()
        };
        cfg.set_api_key(" KEY ".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = \"Oslo\"\nunits = \"standard\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.default_city.as_deref(), Some("Oslo"));
        assert_eq!(cfg.units, Units::Standard);
        assert_eq!(cfg.hourly_window, DEFAULT_HOURLY_WINDOW);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = 42").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
