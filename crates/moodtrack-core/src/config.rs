//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the timezone used for check-in windows,
//! the list page size, and the last used username.
//!
//! Configuration is stored at `~/.config/moodtrack/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::page::DEFAULT_PAGE_SIZE;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "moodtrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "MOODTRACK_API_URL";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Offset of the company's timezone; the machine's own when unset
    #[serde(default)]
    pub utc_offset_hours: Option<i32>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub last_username: Option<String>,
    /// Base URL from the environment for this run only; never saved
    #[serde(skip)]
    pub api_url_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            utc_offset_hours: None,
            page_size: default_page_size(),
            last_username: None,
            api_url_override: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            self.override_api_url(&url);
        }
    }

    /// Point this run at `url` without touching the saved `base_url`
    pub fn override_api_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_url_override = Some(url.to_string());
        }
    }

    /// The base URL requests go to
    pub fn effective_base_url(&self) -> &str {
        self.api_url_override.as_deref().unwrap_or(&self.base_url)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL with exactly one trailing slash, ready for joining paths
    pub fn api_root(&self) -> String {
        format!("{}/", self.effective_base_url().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("config.json")).expect("load");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.utc_offset_hours, None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"utc_offset_hours": 3}"#).expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.utc_offset_hours, Some(3));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("moodtrack").join("config.json");

        let config = Config {
            base_url: "https://mood.example.com/api".into(),
            last_username: Some("rnaivo".into()),
            ..Config::default()
        };
        config.save_to(&path).expect("save");

        let reloaded = Config::load_from(&path).expect("load");
        assert_eq!(reloaded.base_url, "https://mood.example.com/api");
        assert_eq!(reloaded.last_username.as_deref(), Some("rnaivo"));
    }

    #[test]
    fn test_api_root() {
        let mut config = Config::default();
        config.base_url = "https://mood.example.com/api///".into();
        assert_eq!(config.api_root(), "https://mood.example.com/api/");
        config.base_url = "https://mood.example.com".into();
        assert_eq!(config.api_root(), "https://mood.example.com/");
    }

    #[test]
    fn test_env_override_is_not_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        Config::default().save_to(&path).expect("seed");

        let mut config = Config::load_from(&path).expect("load");
        config.override_api_url(" https://staging.example.com ");
        assert_eq!(config.api_root(), "https://staging.example.com/");

        config.last_username = Some("rnaivo".into());
        config.save_to(&path).expect("save");

        let reloaded = Config::load_from(&path).expect("reload");
        assert_eq!(reloaded.base_url, DEFAULT_BASE_URL);
        assert_eq!(reloaded.api_url_override, None);
        assert_eq!(reloaded.api_root(), "http://localhost:8000/");
        assert_eq!(reloaded.last_username.as_deref(), Some("rnaivo"));

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(!raw.contains("staging"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = Config::default();
        config.override_api_url("   ");
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
    }
}
