//! Epinio Panel Library
//!
//! A control panel over the Epinio CLI: cluster connections, namespaces,
//! applications and services, driven through the `epinio` binary with the
//! Epinio HTTP API as a faster path for listings.
//!
//! ## Usage
//!
//! ```bash
//! epinio-panel connections add ~/.config/epinio/settings.yaml
//! epinio-panel apps list
//! epinio-panel apps push web --path ./web
//! epinio-panel tree --services
//! ```
//!
//! ## Namespaces
//!
//! Commands run in the namespace of the active connection unless one is
//! given with `--namespace` or as an `@namespace` prefix:
//!
//! ```bash
//! epinio-panel @staging apps list
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod output;
pub mod parse;
pub mod tree;
pub mod tui;

pub use cli::Cli;
pub use error::{Error, Result};

/// CLI version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI with the given arguments.
///
/// This is the main entry point for the CLI, parsing arguments and
/// dispatching to the appropriate command handler.
pub async fn run(args: Vec<String>) -> Result<()> {
    use clap::Parser;

    // Parse @namespace prefix before clap
    let (namespace_override, args) = cli::parse_namespace_prefix(args);

    let mut cli_args = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            // Print clap error (includes help/version)
            e.print().ok();
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => return Ok(()),
                _ => return Err(Error::other("")),
            }
        },
    };

    if cli_args.namespace.is_none() {
        cli_args.namespace = namespace_override;
    }

    if cli_args.debug {
        init_logging();
    }

    let ctx = client::Context::new(
        cli_args.namespace,
        cli_args.config_file,
        cli_args.output,
        cli_args.color,
        cli_args.quiet,
        cli_args.yes,
        cli_args.debug,
    )?;

    commands::execute(&ctx, &cli_args.command).await
}

/// Initialize tracing/logging for debug mode.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("epinio_panel=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
