//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default registration API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = "hackreg.yaml";

/// hackreg configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the registration and lookup API
    pub api_url: Option<String>,

    /// HTTP timeout in seconds (transport default when unset)
    pub timeout_secs: Option<u64>,

    /// Use the in-memory backend instead of the API
    pub offline: Option<bool>,

    /// Event name shown in confirmations
    pub event_name: Option<String>,

    /// Community link shown after a successful registration
    pub community_url: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(local_override: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config (~/.config/hackreg/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./hackreg.yaml or --config)
        let local_path = local_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
        if let Some(local) = Self::read_file(&local_path) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Read one config file; missing or malformed files are skipped
    pub fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Build the environment layer from a variable lookup
    pub fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            api_url: var("HACKREG_API_URL"),
            timeout_secs: var("HACKREG_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()),
            offline: var("HACKREG_OFFLINE").map(|v| {
                matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes")
            }),
            event_name: None,
            community_url: None,
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hackreg")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.offline.is_some() {
            self.offline = other.offline;
        }
        if other.event_name.is_some() {
            self.event_name = other.event_name;
        }
        if other.community_url.is_some() {
            self.community_url = other.community_url;
        }
    }

    /// API base URL without a trailing slash
    pub fn api_url(&self) -> String {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }

    pub fn event_name(&self) -> String {
        self.event_name
            .clone()
            .unwrap_or_else(|| "Hack[CIS] 2025".to_string())
    }

    pub fn community_url(&self) -> Option<String> {
        self.community_url.clone()
    }
}
