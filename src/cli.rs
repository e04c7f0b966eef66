//! Command-line argument parsing and command definitions.
//!
//! Uses clap with derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Epinio Panel - browse and manage Epinio resources
#[derive(Parser, Debug)]
#[command(name = "epinio-panel")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Namespace to operate in (can also use @namespace syntax as first argument)
    #[arg(short, long, global = true, env = "EPINIO_PANEL_NAMESPACE")]
    pub namespace: Option<String>,

    /// Epinio config file to use instead of the active connection
    #[arg(long, global = true, env = "EPINIO_PANEL_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table", value_parser = ["table", "json", "yaml", "jsonl"])]
    pub output: String,

    /// Color output mode
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    pub color: String,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip confirmations (answer yes to all prompts)
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage cluster connections (Epinio config files)
    #[command(subcommand, alias = "configs")]
    Connections(ConnectionsCommands),

    /// Manage namespaces
    #[command(subcommand, alias = "ns")]
    Namespaces(NamespacesCommands),

    /// Manage applications
    #[command(subcommand, alias = "app")]
    Apps(AppsCommands),

    /// Manage services
    #[command(subcommand, alias = "service")]
    Services(ServicesCommands),

    /// Show namespaces, applications and services as a tree
    Tree {
        /// Include each application's services
        #[arg(long)]
        services: bool,

        /// Show stored connections instead of namespaces
        #[arg(long)]
        connections: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    PowerShell,
}

/// Connection management commands.
#[derive(Subcommand, Debug)]
pub enum ConnectionsCommands {
    /// List stored connections
    List,

    /// Add an Epinio config file (the first one becomes active)
    Add {
        /// Path to the config file
        path: PathBuf,
    },

    /// Make a connection the active one
    Activate {
        /// Path to the config file
        path: PathBuf,
    },

    /// Remove a stored connection
    Delete {
        /// Path to the config file
        path: PathBuf,
    },
}

/// Namespace management commands.
#[derive(Subcommand, Debug)]
pub enum NamespacesCommands {
    /// List namespaces
    List,

    /// Create a namespace
    Create {
        /// Namespace name
        name: String,
    },

    /// Delete a namespace and everything in it
    Delete {
        /// Namespace name
        name: String,
    },
}

/// Application management commands.
#[derive(Subcommand, Debug)]
pub enum AppsCommands {
    /// List applications
    List,

    /// Show application details
    Show {
        /// Application name
        name: String,
    },

    /// Print the application URL
    Url {
        /// Application name
        name: String,
    },

    /// Check whether the application has a running instance
    Health {
        /// Application name
        name: String,
    },

    /// Push an application from a source directory or manifest
    Push {
        /// Application name (read from the manifest when pushing one)
        name: String,

        /// Source directory or manifest file
        #[arg(long, short, default_value = ".")]
        path: PathBuf,
    },

    /// Push again from the last recorded source
    Repush {
        /// Application name
        name: String,
    },

    /// Scale an application
    Scale {
        /// Application name
        name: String,

        /// Instance count (prompted for when omitted)
        instances: Option<String>,
    },

    /// Set an environment variable
    Env {
        /// Application name
        name: String,

        /// Assignment in KEY=VALUE form (prompted for when omitted)
        assignment: Option<String>,
    },

    /// Show application logs
    Logs {
        /// Application name
        name: String,
    },

    /// Open the application in a browser
    Open {
        /// Application name
        name: String,
    },

    /// Delete an application
    Delete {
        /// Application name
        name: String,
    },
}

/// Service management commands.
#[derive(Subcommand, Debug)]
pub enum ServicesCommands {
    /// List services
    List,

    /// Bind a service to an application
    Bind {
        /// Service name
        service: String,

        /// Application name
        app: String,
    },

    /// Unbind a service from an application
    Unbind {
        /// Service name
        service: String,

        /// Application name
        app: String,
    },

    /// Delete a service
    Delete {
        /// Service name
        name: String,
    },
}

/// Parse @namespace prefix from arguments.
///
/// Returns (namespace, remaining_args).
pub fn parse_namespace_prefix(args: Vec<String>) -> (Option<String>, Vec<String>) {
    let mut iter = args.into_iter();
    let Some(binary) = iter.next() else {
        return (None, Vec::new());
    };
    let Some(second) = iter.next() else {
        return (None, vec![binary]);
    };

    match second.strip_prefix('@').filter(|ns| !ns.is_empty()) {
        Some(namespace) => {
            let namespace = namespace.to_string();
            let remaining: Vec<String> = std::iter::once(binary).chain(iter).collect();
            (Some(namespace), remaining)
        },
        None => {
            let remaining: Vec<String> = std::iter::once(binary)
                .chain(std::iter::once(second))
                .chain(iter)
                .collect();
            (None, remaining)
        },
    }
}
