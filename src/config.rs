//! Configuration Management
//!
//! Handles persistent configuration storage for mediadesk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// API base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api/";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "MEDIADESK_API_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL
    #[serde(default)]
    pub api_url: Option<String>,
    /// Last viewed resource
    #[serde(default)]
    pub last_resource: Option<String>,
    /// Whether inactive records are listed
    #[serde(default)]
    pub show_inactive: bool,
    /// File this configuration was loaded from; `None` keeps it in memory
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Directory holding the config and log files
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mediadesk"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(_) => Self::default(),
        };
        config.path = Some(path);
        config
    }

    /// Parse configuration, falling back to defaults on malformed input
    fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config file: {}", e);
            Self::default()
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

        Ok(())
    }

    /// Get effective API URL (CLI > env > config > default)
    pub fn effective_api_url(&self, cli: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(cli, env.as_deref(), self.api_url.as_deref())
    }

    /// Set last viewed resource and save
    pub fn set_last_resource(&mut self, key: &str) -> Result<()> {
        self.last_resource = Some(key.to_string());
        self.save()
    }

    /// Set the inactive toggle and save
    pub fn set_show_inactive(&mut self, show: bool) -> Result<()> {
        self.show_inactive = show;
        self.save()
    }
}

/// First non-blank candidate in precedence order, or the default
fn resolve_api_url(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    [cli, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}
