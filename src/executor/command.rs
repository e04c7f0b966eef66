//! Epinio command lines.
//!
//! Every backend operation is an [`EpinioCommand`]. An [`Invocation`] pairs it
//! with the connection config file and renders the final [`CommandLine`]:
//!
//! ```text
//! epinio [--config-file <path>] <subcommand> <args...>
//! ```
//!
//! The fixed argument layout can be parsed back, which the executor tests
//! rely on to check what was sent.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Flag used to select a connection config file.
pub const CONFIG_FILE_FLAG: &str = "--config-file";

/// A single Epinio CLI operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpinioCommand {
    /// `app list`
    AppList,
    /// `app show <name>`
    AppShow {
        /// Application name.
        name: String,
    },
    /// `app push --name <name> --path <dir>`
    AppPush {
        /// Application name.
        name: String,
        /// Source directory.
        path: PathBuf,
    },
    /// `app push <manifest>`
    AppPushManifest {
        /// Manifest file.
        manifest: PathBuf,
    },
    /// `app update <name> --instances=<n>`
    AppScale {
        /// Application name.
        name: String,
        /// Desired instance count.
        instances: u32,
    },
    /// `app env set <name> <key> <value>`
    AppEnvSet {
        /// Application name.
        name: String,
        /// Variable name.
        key: String,
        /// Variable value.
        value: String,
    },
    /// `app logs <name>`
    AppLogs {
        /// Application name.
        name: String,
    },
    /// `app delete <name>`
    AppDelete {
        /// Application name.
        name: String,
    },
    /// `namespace list`
    NamespaceList,
    /// `namespace create <name>`
    NamespaceCreate {
        /// Namespace name.
        name: String,
    },
    /// `namespace delete <name> --force`
    NamespaceDelete {
        /// Namespace name.
        name: String,
    },
    /// `target <namespace>`
    Target {
        /// Namespace to target.
        namespace: String,
    },
    /// `service list`
    ServiceList,
    /// `service delete <name>`
    ServiceDelete {
        /// Service name.
        name: String,
    },
    /// `service bind <service> <app>`
    ServiceBind {
        /// Service name.
        service: String,
        /// Application name.
        app: String,
    },
    /// `service unbind <service> <app>`
    ServiceUnbind {
        /// Service name.
        service: String,
        /// Application name.
        app: String,
    },
    /// `config update`
    ConfigUpdate,
}

impl EpinioCommand {
    /// Render the subcommand and its arguments.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::AppList => vec!["app".into(), "list".into()],
            Self::AppShow { name } => vec!["app".into(), "show".into(), name.clone()],
            Self::AppPush { name, path } => vec![
                "app".into(),
                "push".into(),
                "--name".into(),
                name.clone(),
                "--path".into(),
                path.display().to_string(),
            ],
            Self::AppPushManifest { manifest } => {
                vec!["app".into(), "push".into(), manifest.display().to_string()]
            },
            Self::AppScale { name, instances } => vec![
                "app".into(),
                "update".into(),
                name.clone(),
                format!("--instances={}", instances),
            ],
            Self::AppEnvSet { name, key, value } => vec![
                "app".into(),
                "env".into(),
                "set".into(),
                name.clone(),
                key.clone(),
                value.clone(),
            ],
            Self::AppLogs { name } => vec!["app".into(), "logs".into(), name.clone()],
            Self::AppDelete { name } => vec!["app".into(), "delete".into(), name.clone()],
            Self::NamespaceList => vec!["namespace".into(), "list".into()],
            Self::NamespaceCreate { name } => {
                vec!["namespace".into(), "create".into(), name.clone()]
            },
            Self::NamespaceDelete { name } => {
                vec!["namespace".into(), "delete".into(), name.clone(), "--force".into()]
            },
            Self::Target { namespace } => vec!["target".into(), namespace.clone()],
            Self::ServiceList => vec!["service".into(), "list".into()],
            Self::ServiceDelete { name } => {
                vec!["service".into(), "delete".into(), name.clone()]
            },
            Self::ServiceBind { service, app } => {
                vec!["service".into(), "bind".into(), service.clone(), app.clone()]
            },
            Self::ServiceUnbind { service, app } => {
                vec!["service".into(), "unbind".into(), service.clone(), app.clone()]
            },
            Self::ConfigUpdate => vec!["config".into(), "update".into()],
        }
    }

    /// Parse a subcommand and its arguments back into a command.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let words: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let owned = |s: &str| s.to_string();

        let command = match words.as_slice() {
            ["app", "list"] => Self::AppList,
            ["app", "show", name] => Self::AppShow { name: owned(name) },
            ["app", "push", "--name", name, "--path", path] => {
                Self::AppPush { name: owned(name), path: PathBuf::from(path) }
            },
            ["app", "push", manifest] => Self::AppPushManifest { manifest: PathBuf::from(manifest) },
            ["app", "update", name, instances] => {
                let count = instances
                    .strip_prefix("--instances=")
                    .ok_or_else(|| Error::parse(format!("expected --instances=<n>, got '{}'", instances)))?;
                let instances = count
                    .parse()
                    .map_err(|_| Error::parse(format!("invalid instance count '{}'", count)))?;
                Self::AppScale { name: owned(name), instances }
            },
            ["app", "env", "set", name, key, value] => {
                Self::AppEnvSet { name: owned(name), key: owned(key), value: owned(value) }
            },
            ["app", "logs", name] => Self::AppLogs { name: owned(name) },
            ["app", "delete", name] => Self::AppDelete { name: owned(name) },
            ["namespace", "list"] => Self::NamespaceList,
            ["namespace", "create", name] => Self::NamespaceCreate { name: owned(name) },
            ["namespace", "delete", name, "--force"] => Self::NamespaceDelete { name: owned(name) },
            ["target", namespace] => Self::Target { namespace: owned(namespace) },
            ["service", "list"] => Self::ServiceList,
            ["service", "delete", name] => Self::ServiceDelete { name: owned(name) },
            ["service", "bind", service, app] => {
                Self::ServiceBind { service: owned(service), app: owned(app) }
            },
            ["service", "unbind", service, app] => {
                Self::ServiceUnbind { service: owned(service), app: owned(app) }
            },
            ["config", "update"] => Self::ConfigUpdate,
            _ => return Err(Error::parse(format!("unrecognized epinio command: {}", words.join(" ")))),
        };

        Ok(command)
    }
}

impl fmt::Display for EpinioCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_args(&self.to_args()))
    }
}

/// An Epinio command bound to a connection config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Connection config file passed as `--config-file`.
    pub config_file: Option<PathBuf>,
    /// The operation.
    pub command: EpinioCommand,
}

impl Invocation {
    /// Create an invocation.
    pub fn new(config_file: Option<PathBuf>, command: EpinioCommand) -> Self {
        Self { config_file, command }
    }

    /// Render the full argument list (everything after the binary).
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = &self.config_file {
            args.push(CONFIG_FILE_FLAG.to_string());
            args.push(path.display().to_string());
        }
        args.extend(self.command.to_args());
        args
    }

    /// Parse a full argument list back into an invocation.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        match args {
            [flag, path, rest @ ..] if flag.as_ref() == CONFIG_FILE_FLAG => Ok(Self {
                config_file: Some(PathBuf::from(path.as_ref())),
                command: EpinioCommand::from_args(rest)?,
            }),
            _ => Ok(Self { config_file: None, command: EpinioCommand::from_args(args)? }),
        }
    }

    /// Build the command line for the given binary.
    pub fn to_command_line(&self, program: &str) -> CommandLine {
        CommandLine::new(program, self.to_args())
    }
}

/// A fully formed external command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Create a command line.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// The program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Parse the arguments back into an invocation.
    pub fn invocation(&self) -> Result<Invocation> {
        Invocation::from_args(&self.args)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        if !self.args.is_empty() {
            write!(f, " {}", join_args(&self.args))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('\'') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

fn join_args(args: &[String]) -> String {
    args.iter().map(|a| quote(a)).collect::<Vec<_>>().join(" ")
}
