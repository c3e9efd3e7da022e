//! Application configuration management.
//!
//! Configuration is stored at `~/.config/unibaby/config.json` and holds the
//! backend base URL and the public site URL. The environment variables
//! `UNIBABY_BACKEND_URL` and `UNIBABY_SITE_URL` take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::location::PageLocation;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "unibaby";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

pub const BACKEND_URL_ENV: &str = "UNIBABY_BACKEND_URL";
pub const SITE_URL_ENV: &str = "UNIBABY_SITE_URL";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = Self::load_from(&path)?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace fields with non-empty values from `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(BACKEND_URL_ENV) {
            self.backend_url = Some(url);
        }
        if let Some(url) = non_empty(SITE_URL_ENV) {
            self.site_url = Some(url);
        }
        self
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    /// The storefront's public location. Falls back to the backend URL when
    /// no site URL is configured.
    pub fn site_location(&self) -> Result<PageLocation> {
        let url = self
            .site_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.backend_url());
        PageLocation::parse(url)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for rolling log files
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::default().with_overrides(no_env);
        assert_eq!(config.backend_url(), "http://localhost:8001");
        assert_eq!(config.site_location().unwrap().origin(), "http://localhost:8001");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = Config {
            backend_url: Some("http://file:8001".into()),
            site_url: Some("https://file.example".into()),
        }
        .with_overrides(|key| match key {
            BACKEND_URL_ENV => Some("https://api.unibaby-pool.kz".into()),
            SITE_URL_ENV => Some("  ".into()),
            _ => None,
        });

        assert_eq!(config.backend_url(), "https://api.unibaby-pool.kz");
        // Blank override is ignored
        assert_eq!(config.site_location().unwrap().as_str(), "https://file.example/");
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("unibaby-config-test-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, r#"{ "backend_url": "http://127.0.0.1:9000" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url(), "http://127.0.0.1:9000");
        assert_eq!(config.site_url, None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("unibaby-config-does-not-exist.json");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_site_url_is_error() {
        let config = Config {
            backend_url: None,
            site_url: Some("not a url".into()),
        };
        assert!(config.site_location().is_err());
    }
}
