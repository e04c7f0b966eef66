//! Command context and the Epinio HTTP client.
//!
//! [`Context`] wires configuration, output and the resource executor together
//! for one CLI invocation.

pub mod api;

use std::{path::PathBuf, sync::Arc};

pub use api::ApiClient;

use crate::config::{Config, ConnectionConfig, FileStateStore, StateStore};
use crate::error::{Error, Result};
use crate::executor::{CommandExecutor, EpinioExecutor};
use crate::output::Output;

/// Context for CLI command execution.
pub struct Context {
    /// Panel configuration.
    pub config: Config,

    /// Output configuration.
    pub output: Output,

    /// Namespace given with `--namespace` or `@namespace`.
    pub namespace: Option<String>,

    /// Config file given with `--config-file`.
    pub config_file: Option<PathBuf>,

    /// Skip confirmations.
    pub yes: bool,

    /// Debug mode.
    pub debug: bool,

    /// Executor for Epinio operations.
    pub executor: Arc<EpinioExecutor>,
}

impl Context {
    /// Create a new context from CLI options.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        namespace: Option<String>,
        config_file: Option<PathBuf>,
        output_format: String,
        color: String,
        quiet: bool,
        yes: bool,
        debug: bool,
    ) -> Result<Self> {
        let config = Config::load()?;
        let state: Arc<dyn StateStore> = Arc::new(FileStateStore::default_location()?);
        Self::with_state(config, state, namespace, config_file, &output_format, &color, quiet, yes, debug)
    }

    /// Create a context over an explicit configuration and state store.
    #[allow(clippy::too_many_arguments)]
    pub fn with_state(
        config: Config,
        state: Arc<dyn StateStore>,
        namespace: Option<String>,
        config_file: Option<PathBuf>,
        output_format: &str,
        color: &str,
        quiet: bool,
        yes: bool,
        debug: bool,
    ) -> Result<Self> {
        // Flags left at their defaults fall back to the config file.
        let format = if output_format == "table" { config.output.format.as_str() } else { output_format };
        let color = if color == "auto" { config.output.color.as_str() } else { color };
        let output = Output::from_cli(format, color, quiet)?;

        let mut runner = CommandExecutor::new().with_env(config.env.clone());
        if let Some(cwd) = &config.cwd {
            runner = runner.with_cwd(cwd);
        }

        let executor = EpinioExecutor::new(config.binary.clone(), Arc::new(runner), state)
            .with_api(config.api_fallback)
            .with_config_file(config_file.clone());

        Ok(Self { config, output, namespace, config_file, yes, debug, executor: Arc::new(executor) })
    }

    /// The namespace to operate in.
    ///
    /// An explicit override wins; otherwise the namespace recorded in the
    /// active connection's config file is used.
    pub fn namespace(&self) -> Result<String> {
        if let Some(namespace) = &self.namespace {
            return Ok(namespace.clone());
        }

        let ctx = self.executor.context()?;
        let connection = ConnectionConfig::load(&ctx.config_path)?;
        connection.namespace().map(str::to_string).ok_or_else(|| {
            Error::invalid_arg(format!(
                "No namespace selected. Use --namespace or set one in {}",
                ctx.config_path.display()
            ))
        })
    }

    /// Prompt before a destructive operation (respects --yes flag).
    pub fn confirm(&self, message: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }
        crate::tui::confirm_danger(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{ClusterInfo, ClusterState, MemoryStateStore};

    fn context(state: ClusterState, namespace: Option<&str>) -> Context {
        Context::with_state(
            Config::default(),
            Arc::new(MemoryStateStore::new(state)),
            namespace.map(str::to_string),
            None,
            "table",
            "never",
            false,
            true,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_namespace_override_wins() {
        let ctx = context(ClusterState::default(), Some("workspace"));
        assert_eq!(ctx.namespace().unwrap(), "workspace");
    }

    #[test]
    fn test_namespace_without_connection() {
        let ctx = context(ClusterState::default(), None);
        assert!(matches!(ctx.namespace(), Err(Error::NoActiveConnection)));
    }

    #[test]
    fn test_namespace_from_active_connection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api: https://epinio.example.io\nnamespace: staging\n").unwrap();

        let mut info = ClusterInfo::new(&path);
        info.config.active = true;
        let ctx = context(ClusterState::new(vec![info]), None);

        assert_eq!(ctx.namespace().unwrap(), "staging");
    }

    #[test]
    fn test_confirm_with_yes() {
        let ctx = context(ClusterState::default(), None);
        assert!(ctx.confirm("Delete everything?").unwrap());
    }

    #[test]
    fn test_config_output_defaults_apply() {
        let mut config = Config::default();
        config.output.format = "json".into();
        let ctx = Context::with_state(
            config,
            Arc::new(MemoryStateStore::default()),
            None,
            None,
            "table",
            "never",
            false,
            false,
            false,
        )
        .unwrap();
        assert_eq!(ctx.output.format(), crate::output::OutputFormat::Json);
    }
}
