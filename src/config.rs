//! Configuration Management
//!
//! Handles persistent configuration storage for pagepurge.

use crate::campaign::EngineSettings;
use crate::graph::client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::graph::gateway::DEFAULT_LIST_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default pause between deletions in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Graph listing edges refuse page sizes above this
pub const MAX_PAGE_LIMIT: u32 = 100;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Graph API host, e.g. `https://graph.facebook.com`
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Graph API version segment, e.g. `v18.0`
    #[serde(default)]
    pub api_version: Option<String>,
    /// Pause between deletions
    #[serde(default)]
    pub delay_ms: Option<u64>,
    /// Items requested per listing page
    #[serde(default)]
    pub page_limit: Option<u32>,
    /// Per-request timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Last page a campaign ran against
    #[serde(default)]
    pub last_page_id: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pagepurge").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    pub fn effective_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn effective_api_version(&self) -> String {
        self.api_version
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string())
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Engine settings (CLI > config > default)
    pub fn engine_settings(&self, delay_ms: Option<u64>, page_limit: Option<u32>) -> EngineSettings {
        let delay = delay_ms.or(self.delay_ms).unwrap_or(DEFAULT_DELAY_MS);
        let limit = page_limit
            .or(self.page_limit)
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);

        EngineSettings {
            delay: Duration::from_millis(delay),
            page_limit: limit,
        }
    }

    /// Page to target (CLI > last used)
    pub fn effective_page_id(&self, cli: Option<&str>) -> Option<String> {
        cli.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| self.last_page_id.clone())
    }

    /// Remember the page and save
    pub fn set_last_page(&mut self, page_id: &str) -> Result<()> {
        self.last_page_id = Some(page_id.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.effective_base_url(), "https://graph.facebook.com");
        assert_eq!(config.effective_api_version(), "v18.0");
        assert_eq!(config.effective_timeout(), Duration::from_secs(30));

        let settings = config.engine_settings(None, None);
        assert_eq!(settings.delay, Duration::from_millis(100));
        assert_eq!(settings.page_limit, 100);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = Config {
            delay_ms: Some(250),
            page_limit: Some(25),
            last_page_id: Some("old".into()),
            ..Default::default()
        };

        let settings = config.engine_settings(Some(0), None);
        assert_eq!(settings.delay, Duration::ZERO);
        assert_eq!(settings.page_limit, 25);

        assert_eq!(config.effective_page_id(Some("new")).as_deref(), Some("new"));
        assert_eq!(config.effective_page_id(Some("  ")).as_deref(), Some("old"));
        assert_eq!(config.effective_page_id(None).as_deref(), Some("old"));
    }

    #[test]
    fn test_page_limit_is_clamped() {
        let config = Config::default();
        assert_eq!(config.engine_settings(None, Some(5000)).page_limit, 100);
        assert_eq!(config.engine_settings(None, Some(0)).page_limit, 1);
    }

    #[test]
    fn test_round_trip_and_malformed_file() {
        let dir = std::env::temp_dir().join(format!("pagepurge-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.json");

        let config = Config {
            api_version: Some("v19.0".into()),
            last_page_id: Some("1234".into()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pagepurge-definitely-missing.json");
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
