//! Configuration system for the Epinio panel.
//!
//! The configuration follows XDG Base Directory Specification and supports:
//! - User config: `~/.config/epinio-panel/config.yaml`
//! - Project config: `.epinio-panel.yaml` in current directory
//! - Environment variables: `EPINIO_PANEL_*`
//! - Command-line flags (highest precedence)
//!
//! Cluster connections are not part of this file; they live in the persisted
//! client state (see [`state`]).

pub mod connection;
pub mod state;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

pub use connection::ConnectionConfig;
use serde::{Deserialize, Serialize};
pub use state::{
    AppSource, ClusterConnection, ClusterInfo, ClusterState, FileStateStore, MemoryStateStore,
    StateStore,
};

use crate::error::{Error, Result};

/// Name of the Epinio CLI binary when nothing else is configured.
pub const DEFAULT_BINARY: &str = "epinio";

/// Main panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Epinio CLI binary (name on PATH or absolute path).
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Working directory for spawned commands.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Environment overlay for spawned commands.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Try the HTTP API before the CLI for list operations.
    #[serde(default = "default_true")]
    pub api_fallback: bool,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (table, json, yaml).
    #[serde(default = "default_format")]
    pub format: String,

    /// Color output mode (auto, always, never).
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "table".to_string()
}

fn default_color() -> String {
    "auto".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: default_format(), color: default_color() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            cwd: None,
            env: HashMap::new(),
            api_fallback: true,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Resolution order (highest to lowest):
    /// 1. CLI flags (handled separately)
    /// 2. Environment variables
    /// 3. Project config (`.epinio-panel.yaml`)
    /// 4. User config (`~/.config/epinio-panel/config.yaml`)
    /// 5. Defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_path()
            && path.exists()
        {
            let user_config = Self::load_from_file(&path)?;
            config.merge(user_config);
        }

        let project_path = PathBuf::from(".epinio-panel.yaml");
        if project_path.exists() {
            let project_config = Self::load_from_file(&project_path)?;
            config.merge(project_config);
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to the user config file.
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| Error::config("Cannot determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self)?;
        std::fs::write(&path, contents)?;

        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    fn merge(&mut self, other: Self) {
        if other.binary != default_binary() {
            self.binary = other.binary;
        }

        if other.cwd.is_some() {
            self.cwd = other.cwd;
        }

        self.env.extend(other.env);

        if !other.api_fallback {
            self.api_fallback = false;
        }

        if other.output.format != default_format() {
            self.output.format = other.output.format;
        }

        if other.output.color != default_color() {
            self.output.color = other.output.color;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(binary) = var("EPINIO_PANEL_BINARY").filter(|b| !b.is_empty()) {
            self.binary = binary;
        }

        if let Some(cwd) = var("EPINIO_PANEL_CWD").filter(|c| !c.is_empty()) {
            self.cwd = Some(PathBuf::from(cwd));
        }

        if let Some(flag) = var("EPINIO_PANEL_API_FALLBACK") {
            self.api_fallback = !matches!(flag.to_lowercase().as_str(), "0" | "false" | "no");
        }
    }

    /// Get the path to the user config file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.yaml"))
    }

    /// Get the path to the user config directory.
    ///
    /// Cross-platform behavior:
    /// - If `XDG_CONFIG_HOME` is set, uses `$XDG_CONFIG_HOME/epinio-panel`
    /// - Linux/macOS: Falls back to `~/.config/epinio-panel` (XDG default)
    /// - Windows: Falls back to `%APPDATA%\epinio-panel`
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join("epinio-panel"));
        }

        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join("epinio-panel"))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(".config").join("epinio-panel"))
        }
    }

    /// Get the path to the state directory.
    ///
    /// Cross-platform behavior:
    /// - If `XDG_STATE_HOME` is set, uses `$XDG_STATE_HOME/epinio-panel`
    /// - Linux/macOS: Falls back to `~/.local/state/epinio-panel` (XDG default)
    /// - Windows: Falls back to `%LOCALAPPDATA%\epinio-panel`
    #[must_use]
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME")
            && !xdg_state.is_empty()
        {
            return Some(PathBuf::from(xdg_state).join("epinio-panel"));
        }

        #[cfg(windows)]
        {
            dirs::data_local_dir().map(|p| p.join("epinio-panel"))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(".local").join("state").join("epinio-panel"))
        }
    }
}
