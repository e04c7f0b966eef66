//! Resource executor.
//!
//! Translates domain operations into Epinio CLI invocations (and HTTP calls
//! for list operations), resolving an [`OperationContext`] right before each
//! one. Namespace-scoped operations run as a two-step saga: `target <ns>`,
//! then the operation. A failed target aborts the saga.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::channel::{DEFAULT_CHANNEL, OutputChannels};
use super::command::{EpinioCommand, Invocation};
use super::input::{self, EnvAssignment, Prompter};
use super::process::CommandRunner;
use crate::client::ApiClient;
use crate::config::{ClusterState, ConnectionConfig, StateStore};
use crate::error::{Error, Result};
use crate::model::{AppRecord, NamespaceRecord, ServiceRecord};
use crate::parse::{self, Column, RowWarning};

/// Opens a URL for the operator.
pub type Opener = Arc<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

/// Where an operation runs: which connection config, which namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    /// Connection config file passed as `--config-file`.
    pub config_path: PathBuf,
    /// Target namespace, for namespace-scoped operations.
    pub namespace: Option<String>,
}

impl OperationContext {
    /// Context for a connection with no namespace.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self { config_path: config_path.into(), namespace: None }
    }

    /// The same connection, scoped to `namespace`.
    pub fn in_namespace(&self, namespace: &str) -> Self {
        Self { config_path: self.config_path.clone(), namespace: Some(namespace.to_string()) }
    }
}

/// Steps of a namespace-scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    /// `target <namespace>`
    Target,
    /// The operation itself.
    Action,
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => f.write_str("target"),
            Self::Action => f.write_str("action"),
        }
    }
}

/// Executes Epinio operations against the active connection.
pub struct EpinioExecutor {
    binary: String,
    runner: Arc<dyn CommandRunner>,
    state: Arc<dyn StateStore>,
    channels: Arc<OutputChannels>,
    api_enabled: bool,
    config_override: Option<PathBuf>,
    opener: Opener,
}

impl fmt::Debug for EpinioExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpinioExecutor")
            .field("binary", &self.binary)
            .field("api_enabled", &self.api_enabled)
            .field("config_override", &self.config_override)
            .finish()
    }
}

impl EpinioExecutor {
    /// Create an executor for `binary`.
    pub fn new(
        binary: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            binary: binary.into(),
            runner,
            state,
            channels: Arc::new(OutputChannels::new()),
            api_enabled: true,
            config_override: None,
            opener: Arc::new(webbrowser::open),
        }
    }

    /// Enable or disable the HTTP API path for list operations.
    pub fn with_api(mut self, enabled: bool) -> Self {
        self.api_enabled = enabled;
        self
    }

    /// Use `path` instead of the active connection.
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    /// Replace how URLs are opened.
    pub fn with_opener(
        mut self,
        opener: impl Fn(&str) -> io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.opener = Arc::new(opener);
        self
    }

    /// Output channels written by this executor.
    pub fn channels(&self) -> &Arc<OutputChannels> {
        &self.channels
    }

    /// The Epinio binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Resolve the context for the next operation.
    ///
    /// The state store is read on every call, so a connection switched by
    /// another process is picked up by the next operation.
    pub fn context(&self) -> Result<OperationContext> {
        if let Some(path) = &self.config_override {
            return Ok(OperationContext::new(path));
        }

        let state = self.state.load()?;
        let active = state.active().ok_or(Error::NoActiveConnection)?;
        Ok(OperationContext::new(&active.config.path))
    }

    /// Run one command in `ctx`.
    pub async fn run(&self, ctx: &OperationContext, command: EpinioCommand) -> Result<String> {
        let invocation = Invocation::new(Some(ctx.config_path.clone()), command);
        let line = invocation.to_command_line(&self.binary);
        debug!(command = %line, namespace = ?ctx.namespace, "running epinio");

        self.runner.run(&line).await
    }

    /// Target `namespace`, then run `command`.
    ///
    /// If targeting fails the command is never issued and the targeting
    /// error is returned.
    pub async fn run_in_namespace(
        &self,
        ctx: &OperationContext,
        namespace: &str,
        command: EpinioCommand,
    ) -> Result<String> {
        let ctx = ctx.in_namespace(namespace);

        let target = EpinioCommand::Target { namespace: namespace.to_string() };
        if let Err(e) = self.run(&ctx, target).await {
            warn!(step = %SagaStep::Target, namespace, error = %e, "aborting namespace operation");
            return Err(e);
        }

        self.run(&ctx, command).await.inspect_err(|e| {
            debug!(step = %SagaStep::Action, namespace, error = %e, "namespace operation failed");
        })
    }

    fn api_client(&self, ctx: &OperationContext) -> Option<ApiClient> {
        if !self.api_enabled {
            return None;
        }

        let client = ConnectionConfig::load(&ctx.config_path)
            .and_then(|config| ApiClient::from_connection(&config));
        match client {
            Ok(client) => client,
            Err(e) => {
                debug!(error = %e, "API unavailable for connection, using CLI");
                None
            },
        }
    }

    // Namespaces

    /// List namespaces, from the API when available, else the CLI.
    pub async fn list_namespaces(&self) -> Result<Vec<NamespaceRecord>> {
        let ctx = self.context()?;

        if let Some(api) = self.api_client(&ctx) {
            match api.namespaces().await {
                Ok(namespaces) => return Ok(namespaces),
                Err(e) => warn!(error = %e, "API namespace listing failed, falling back to CLI"),
            }
        }

        let output = self.run(&ctx, EpinioCommand::NamespaceList).await?;
        Ok(rows(&output, NamespaceRecord::EXPECTED)
            .iter()
            .filter_map(NamespaceRecord::from_row)
            .collect())
    }

    /// Create a namespace, through the API when available.
    pub async fn create_namespace(&self, name: &str) -> Result<()> {
        let ctx = self.context()?;

        if let Some(api) = self.api_client(&ctx) {
            match api.create_namespace(name).await {
                Ok(()) => {
                    info!(namespace = name, "namespace created");
                    return Ok(());
                },
                Err(e) => warn!(error = %e, "API namespace creation failed, falling back to CLI"),
            }
        }

        self.run(&ctx, EpinioCommand::NamespaceCreate { name: name.to_string() }).await?;
        info!(namespace = name, "namespace created");
        Ok(())
    }

    /// Delete a namespace and everything in it.
    pub async fn delete_namespace(&self, name: &str) -> Result<()> {
        let ctx = self.context()?;
        self.run(&ctx, EpinioCommand::NamespaceDelete { name: name.to_string() }).await?;
        info!(namespace = name, "namespace deleted");
        Ok(())
    }

    // Applications

    /// List applications in `namespace`.
    pub async fn list_applications(&self, namespace: &str) -> Result<Vec<AppRecord>> {
        let ctx = self.context()?;

        if let Some(api) = self.api_client(&ctx) {
            match api.applications(namespace).await {
                Ok(apps) => return Ok(apps),
                Err(e) => warn!(error = %e, namespace, "API app listing failed, falling back to CLI"),
            }
        }

        let output = self.run_in_namespace(&ctx, namespace, EpinioCommand::AppList).await?;
        Ok(rows(&output, AppRecord::EXPECTED).iter().filter_map(AppRecord::from_row).collect())
    }

    /// Raw `app show` output.
    pub async fn show_application(&self, namespace: &str, name: &str) -> Result<String> {
        let ctx = self.context()?;
        self.run_in_namespace(&ctx, namespace, EpinioCommand::AppShow { name: name.to_string() })
            .await
    }

    /// Public URL of an application, built from its first route.
    pub async fn application_url(&self, namespace: &str, name: &str) -> Result<String> {
        let output = self.show_application(namespace, name).await?;
        route_url(&parse::split_lines(&output))
    }

    /// Namespace reported by `app show`.
    pub async fn application_namespace(&self, namespace: &str, name: &str) -> Result<String> {
        let output = self.show_application(namespace, name).await?;
        let lines = parse::split_lines(&output);
        parse::detail_field(&lines, "Namespace").or_else(|_| parse::namespace_field(&lines))
    }

    /// Whether the application is listed with at least one running instance.
    pub async fn is_application_healthy(&self, namespace: &str, name: &str) -> Result<bool> {
        let apps = self.list_applications(namespace).await?;
        Ok(apps.iter().any(|app| app.name == name && app.is_healthy()))
    }

    /// Push an application from a source directory.
    pub async fn push(&self, namespace: &str, name: &str, path: &Path) -> Result<String> {
        let ctx = self.context()?;
        let command = EpinioCommand::AppPush { name: name.to_string(), path: path.to_path_buf() };
        let output = self.run_in_namespace(&ctx, namespace, command).await?;

        info!(app = name, namespace, path = %path.display(), "application pushed");
        self.remember_source(&ctx, name, path);
        Ok(output)
    }

    /// Push an application from a manifest. Returns the application name
    /// declared in the manifest.
    pub async fn push_manifest(&self, namespace: &str, manifest: &Path) -> Result<String> {
        let name = manifest_app_name(manifest)?;
        let ctx = self.context()?;
        let command = EpinioCommand::AppPushManifest { manifest: manifest.to_path_buf() };
        self.run_in_namespace(&ctx, namespace, command).await?;

        info!(app = %name, namespace, manifest = %manifest.display(), "application pushed");
        self.remember_source(&ctx, &name, manifest);
        Ok(name)
    }

    /// Push from a directory or a manifest file, whichever `source` is.
    pub async fn push_source(&self, namespace: &str, name: &str, source: &Path) -> Result<()> {
        if source.is_file() {
            self.push_manifest(namespace, source).await?;
        } else {
            self.push(namespace, name, source).await?;
        }
        Ok(())
    }

    /// Push again from the source recorded at the last successful push
    /// through the same connection.
    pub async fn repush(&self, namespace: &str, name: &str) -> Result<()> {
        let ctx = self.context()?;
        let state = self.state.load()?;
        let source =
            state.source_path(&ctx.config_path, name).map(Path::to_path_buf).ok_or_else(|| {
                Error::invalid_arg(format!(
                    "No source recorded for application '{}'; push it with --path first",
                    name
                ))
            })?;
        self.push_source(namespace, name, &source).await
    }

    /// Scale an application to `instances`.
    pub async fn scale(&self, namespace: &str, name: &str, instances: u32) -> Result<()> {
        let ctx = self.context()?;
        let command = EpinioCommand::AppScale { name: name.to_string(), instances };
        self.run_in_namespace(&ctx, namespace, command).await?;
        info!(app = name, instances, "application scaled");
        Ok(())
    }

    /// Set an environment variable on an application.
    pub async fn set_env(&self, namespace: &str, name: &str, env: &EnvAssignment) -> Result<()> {
        let ctx = self.context()?;
        let command = EpinioCommand::AppEnvSet {
            name: name.to_string(),
            key: env.key.clone(),
            value: env.value.clone(),
        };
        self.run_in_namespace(&ctx, namespace, command).await?;
        info!(app = name, key = %env.key, "environment variable set");
        Ok(())
    }

    /// Ask for a `KEY=VALUE` assignment, then set it.
    pub async fn set_env_interactive(
        &self,
        namespace: &str,
        name: &str,
        prompter: &dyn Prompter,
    ) -> Result<EnvAssignment> {
        let env = input::request_env(prompter)?;
        self.set_env(namespace, name, &env).await?;
        Ok(env)
    }

    /// Fetch application logs. The default channel is replaced with them.
    pub async fn logs(&self, namespace: &str, name: &str) -> Result<String> {
        let ctx = self.context()?;
        let output = self
            .run_in_namespace(&ctx, namespace, EpinioCommand::AppLogs { name: name.to_string() })
            .await?;

        let channel = self.channels.open(DEFAULT_CHANNEL);
        channel.clear();
        channel.append(&output);
        Ok(output)
    }

    /// Open the application URL. Returns the URL.
    pub async fn open(&self, namespace: &str, name: &str) -> Result<String> {
        let url = self.application_url(namespace, name).await?;
        debug!(%url, "opening application");
        (self.opener)(&url)?;
        Ok(url)
    }

    /// Delete an application and forget its recorded source.
    pub async fn delete_application(&self, namespace: &str, name: &str) -> Result<()> {
        let ctx = self.context()?;
        self.run_in_namespace(&ctx, namespace, EpinioCommand::AppDelete { name: name.to_string() })
            .await?;
        info!(app = name, namespace, "application deleted");

        let forgotten = self.state.load().and_then(|mut state| {
            state.forget_app(&ctx.config_path, name)?;
            self.state.save(&state)
        });
        if let Err(e) = forgotten {
            debug!(app = name, error = %e, "no recorded source to forget");
        }
        Ok(())
    }

    fn remember_source(&self, ctx: &OperationContext, name: &str, source: &Path) {
        let recorded = self.state.load().and_then(|mut state| {
            state.record_app(&ctx.config_path, name, source)?;
            self.state.save(&state)
        });
        if let Err(e) = recorded {
            warn!(app = name, error = %e, "could not record application source");
        }
    }

    // Services

    /// List services in `namespace`.
    pub async fn list_services(&self, namespace: &str) -> Result<Vec<ServiceRecord>> {
        let ctx = self.context()?;
        let output = self.run_in_namespace(&ctx, namespace, EpinioCommand::ServiceList).await?;
        Ok(rows(&output, ServiceRecord::EXPECTED)
            .iter()
            .filter_map(ServiceRecord::from_row)
            .collect())
    }

    /// Bind a service to an application.
    pub async fn bind_service(&self, namespace: &str, service: &str, app: &str) -> Result<()> {
        let ctx = self.context()?;
        let command =
            EpinioCommand::ServiceBind { service: service.to_string(), app: app.to_string() };
        self.run_in_namespace(&ctx, namespace, command).await?;
        info!(service, app, "service bound");
        Ok(())
    }

    /// Unbind a service from an application.
    pub async fn unbind_service(&self, namespace: &str, service: &str, app: &str) -> Result<()> {
        let ctx = self.context()?;
        let command =
            EpinioCommand::ServiceUnbind { service: service.to_string(), app: app.to_string() };
        self.run_in_namespace(&ctx, namespace, command).await?;
        info!(service, app, "service unbound");
        Ok(())
    }

    /// Delete a service.
    pub async fn delete_service(&self, namespace: &str, name: &str) -> Result<()> {
        let ctx = self.context()?;
        self.run_in_namespace(&ctx, namespace, EpinioCommand::ServiceDelete {
            name: name.to_string(),
        })
        .await?;
        info!(service = name, namespace, "service deleted");
        Ok(())
    }

    // Connections

    /// The stored connections.
    pub fn connections(&self) -> Result<ClusterState> {
        self.state.load()
    }

    /// Add a connection. The first one added is activated.
    ///
    /// Returns whether the new connection is active.
    pub async fn add_connection(&self, path: &Path) -> Result<bool> {
        let previous = self.state.load()?;
        let mut next = previous.clone();
        let active = next.add(path)?;
        self.state.save(&next)?;

        if active {
            self.commit_activation(path, &previous).await?;
        }
        info!(connection = %path.display(), active, "connection added");
        Ok(active)
    }

    /// Make `path` the only active connection and tell the backend.
    ///
    /// If the backend rejects the switch, the previous list is restored.
    pub async fn activate_connection(&self, path: &Path) -> Result<()> {
        let previous = self.state.load()?;
        let mut next = previous.clone();
        next.activate(path)?;
        self.state.save(&next)?;

        self.commit_activation(path, &previous).await?;
        info!(connection = %path.display(), "connection activated");
        Ok(())
    }

    async fn commit_activation(&self, path: &Path, previous: &ClusterState) -> Result<()> {
        let ctx = OperationContext::new(path);
        if let Err(e) = self.run(&ctx, EpinioCommand::ConfigUpdate).await {
            warn!(connection = %path.display(), error = %e, "activation failed, restoring state");
            if let Err(restore) = self.state.save(previous) {
                error!(connection = %path.display(), error = %restore, "could not restore state");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a stored connection. The active one cannot be removed.
    pub fn delete_connection(&self, path: &Path) -> Result<()> {
        let mut state = self.state.load()?;
        state.remove(path)?;
        self.state.save(&state)?;
        info!(connection = %path.display(), "connection deleted");
        Ok(())
    }
}

/// Parse a table, logging columns that differ from `expected`.
///
/// Missing columns are warnings; extra columns only show up in debug logs.
fn rows(output: &str, expected: &[Column]) -> Vec<parse::ParsedRow> {
    let rows = parse::parse_table(output);
    if let Some(first) = rows.first() {
        for warning in first.validate(expected) {
            match &warning {
                RowWarning::Missing(_) => warn!(%warning, "unexpected table layout"),
                RowWarning::Unexpected(_) => debug!(%warning, "extra table column"),
            }
        }
    }
    rows
}

/// Build an `https://` URL from the first `Routes` entry.
fn route_url<S: AsRef<str>>(lines: &[S]) -> Result<String> {
    let routes = parse::detail_field(lines, "Routes")?;
    let route = routes
        .split(',')
        .map(str::trim)
        .find(|r| !r.is_empty())
        .ok_or_else(|| Error::FieldNotFound("Routes".to_string()))?;

    if route.starts_with("http://") || route.starts_with("https://") {
        Ok(route.to_string())
    } else {
        Ok(format!("https://{}", route))
    }
}

/// Read the `name` of the application declared in a manifest.
fn manifest_app_name(manifest: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(manifest).map_err(|e| {
        Error::invalid_arg(format!("Failed to read manifest {}: {}", manifest.display(), e))
    })?;
    let document: serde_yaml::Value = serde_yaml::from_str(&contents)?;

    document
        .get("name")
        .and_then(serde_yaml::Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.trim().to_string())
        .ok_or_else(|| {
            Error::invalid_arg(format!("Manifest {} declares no application name", manifest.display()))
        })
}
