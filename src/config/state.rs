//! Persisted client state.
//!
//! The panel remembers which Epinio config files it knows about, which one is
//! active, and where each pushed application's source lives. The list is read
//! and written as a whole through a [`StateStore`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One Epinio CLI config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConnection {
    /// Path to the config file.
    pub path: PathBuf,

    /// Whether this is the active connection.
    #[serde(default)]
    pub active: bool,
}

/// Where an application was pushed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSource {
    /// Application name.
    pub name: String,

    /// Source directory or manifest file.
    pub source_path: PathBuf,

    /// When the last successful push finished.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A connection plus the applications pushed through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// The connection.
    pub config: ClusterConnection,

    /// Applications pushed from this machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<AppSource>>,
}

impl ClusterInfo {
    /// A new, inactive connection record.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { config: ClusterConnection { path: path.into(), active: false }, apps: None }
    }
}

/// The full persisted connection list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterState {
    clusters: Vec<ClusterInfo>,
}

impl ClusterState {
    /// Wrap a connection list.
    pub fn new(clusters: Vec<ClusterInfo>) -> Self {
        Self { clusters }
    }

    /// All connections in stored order.
    pub fn clusters(&self) -> &[ClusterInfo] {
        &self.clusters
    }

    /// Whether no connection is stored.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// The active connection, if any.
    pub fn active(&self) -> Option<&ClusterInfo> {
        self.clusters.iter().find(|c| c.config.active)
    }

    /// Look up a connection by path.
    pub fn get(&self, path: &Path) -> Option<&ClusterInfo> {
        self.clusters.iter().find(|c| c.config.path == path)
    }

    /// Add a connection. The first connection becomes active.
    ///
    /// Returns whether the new connection is active.
    pub fn add(&mut self, path: &Path) -> Result<bool> {
        if self.get(path).is_some() {
            return Err(Error::config(format!(
                "Connection '{}' already exists",
                path.display()
            )));
        }

        let mut info = ClusterInfo::new(path);
        info.config.active = self.clusters.is_empty();
        let active = info.config.active;
        self.clusters.push(info);
        Ok(active)
    }

    /// Make `path` the only active connection.
    ///
    /// Every other connection is deactivated in the same step.
    pub fn activate(&mut self, path: &Path) -> Result<()> {
        if self.get(path).is_none() {
            return Err(Error::config(format!("Unknown connection '{}'", path.display())));
        }

        for info in &mut self.clusters {
            info.config.active = info.config.path == path;
        }
        Ok(())
    }

    /// Remove a connection. The active connection cannot be removed.
    pub fn remove(&mut self, path: &Path) -> Result<ClusterInfo> {
        let index = self
            .clusters
            .iter()
            .position(|c| c.config.path == path)
            .ok_or_else(|| Error::config(format!("Unknown connection '{}'", path.display())))?;

        if self.clusters[index].config.active {
            return Err(Error::config("Active cluster connection cannot be deleted"));
        }

        Ok(self.clusters.remove(index))
    }

    fn get_mut(&mut self, path: &Path) -> Result<&mut ClusterInfo> {
        self.clusters
            .iter_mut()
            .find(|c| c.config.path == path)
            .ok_or_else(|| Error::config(format!("Unknown connection '{}'", path.display())))
    }

    /// Record the source of an application pushed through `connection`.
    ///
    /// An existing record for the same application is replaced.
    pub fn record_app(&mut self, connection: &Path, name: &str, source_path: &Path) -> Result<()> {
        let apps = self.get_mut(connection)?.apps.get_or_insert_with(Vec::new);
        apps.retain(|a| a.name != name);
        apps.push(AppSource {
            name: name.to_string(),
            source_path: source_path.to_path_buf(),
            pushed_at: Some(Utc::now()),
        });
        Ok(())
    }

    /// Forget an application deleted through `connection`.
    pub fn forget_app(&mut self, connection: &Path, name: &str) -> Result<()> {
        if let Some(apps) = self.get_mut(connection)?.apps.as_mut() {
            apps.retain(|a| a.name != name);
        }
        Ok(())
    }

    /// Source recorded for an application pushed through `connection`.
    pub fn source_path(&self, connection: &Path, name: &str) -> Option<&Path> {
        self.get(connection)?
            .apps
            .as_ref()?
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.source_path.as_path())
    }

    /// Number of active connections. Always 0 or 1 for a consistent state.
    pub fn active_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.config.active).count()
    }
}

/// Storage for [`ClusterState`].
pub trait StateStore: Send + Sync {
    /// Read the whole state.
    fn load(&self) -> Result<ClusterState>;

    /// Replace the whole state.
    fn save(&self, state: &ClusterState) -> Result<()>;
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Use `path` as the state file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default state file in the user state directory.
    pub fn default_location() -> Result<Self> {
        let dir = super::Config::state_dir()
            .ok_or_else(|| Error::config("Cannot determine state directory"))?;
        Ok(Self::new(dir.join("state.json")))
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<ClusterState> {
        if !self.path.exists() {
            return Ok(ClusterState::default());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::config(format!("Failed to read state file {}: {}", self.path.display(), e))
        })?;

        if contents.trim().is_empty() {
            return Ok(ClusterState::default());
        }

        serde_json::from_str(&contents).map_err(|e| {
            Error::config(format!("Failed to parse state file {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, state: &ClusterState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory store, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<ClusterState>,
}

impl MemoryStateStore {
    /// Start from the given state.
    pub fn new(state: ClusterState) -> Self {
        Self { state: Mutex::new(state) }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<ClusterState> {
        Ok(self.state.lock().clone())
    }

    fn save(&self, state: &ClusterState) -> Result<()> {
        *self.state.lock() = state.clone();
        Ok(())
    }
}
