//! Common test utilities.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated home for one test: config, state and working directory all
/// live under a temporary directory.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an Epinio connection config file and return its path.
    pub fn connection(&self, name: &str, namespace: &str) -> PathBuf {
        let path = self.path().join(name);
        let contents = format!(
            "api: https://epinio.example.io\nuser: admin\npass: secret\nnamespace: {namespace}\n"
        );
        std::fs::write(&path, contents).unwrap();
        std::fs::canonicalize(path).unwrap()
    }

    /// A panel command that runs `binary` as the Epinio CLI.
    pub fn cmd(&self, binary: &str) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("epinio-panel"));
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("XDG_STATE_HOME", self.path().join("state"))
            .env("EPINIO_PANEL_BINARY", binary)
            .env("EPINIO_PANEL_API_FALLBACK", "false")
            .env_remove("EPINIO_PANEL_NAMESPACE")
            .env_remove("EPINIO_PANEL_CONFIG_FILE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Path of the persisted state file.
    pub fn state_file(&self) -> PathBuf {
        self.path().join("state").join("epinio-panel").join("state.json")
    }
}
