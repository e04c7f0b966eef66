//! Command implementations for the Epinio panel.
//!
//! Each submodule implements a group of related commands.

mod apps;
mod connections;
mod namespaces;
mod services;
mod tree;

use crate::cli::{AppsCommands, Commands, ConnectionsCommands, NamespacesCommands, ServicesCommands};
use crate::client::Context;
use crate::error::Result;

/// Execute a CLI command.
pub async fn execute(ctx: &Context, command: &Commands) -> Result<()> {
    match command {
        Commands::Connections(sub) => match sub {
            ConnectionsCommands::List => connections::list(ctx),
            ConnectionsCommands::Add { path } => connections::add(ctx, path).await,
            ConnectionsCommands::Activate { path } => connections::activate(ctx, path).await,
            ConnectionsCommands::Delete { path } => connections::delete(ctx, path),
        },

        Commands::Namespaces(sub) => match sub {
            NamespacesCommands::List => namespaces::list(ctx).await,
            NamespacesCommands::Create { name } => namespaces::create(ctx, name).await,
            NamespacesCommands::Delete { name } => namespaces::delete(ctx, name).await,
        },

        Commands::Apps(sub) => match sub {
            AppsCommands::List => apps::list(ctx).await,
            AppsCommands::Show { name } => apps::show(ctx, name).await,
            AppsCommands::Url { name } => apps::url(ctx, name).await,
            AppsCommands::Health { name } => apps::health(ctx, name).await,
            AppsCommands::Push { name, path } => apps::push(ctx, name, path).await,
            AppsCommands::Repush { name } => apps::repush(ctx, name).await,
            AppsCommands::Scale { name, instances } => {
                apps::scale(ctx, name, instances.as_deref()).await
            },
            AppsCommands::Env { name, assignment } => {
                apps::env(ctx, name, assignment.as_deref()).await
            },
            AppsCommands::Logs { name } => apps::logs(ctx, name).await,
            AppsCommands::Open { name } => apps::open(ctx, name).await,
            AppsCommands::Delete { name } => apps::delete(ctx, name).await,
        },

        Commands::Services(sub) => match sub {
            ServicesCommands::List => services::list(ctx).await,
            ServicesCommands::Bind { service, app } => services::bind(ctx, service, app).await,
            ServicesCommands::Unbind { service, app } => services::unbind(ctx, service, app).await,
            ServicesCommands::Delete { name } => services::delete(ctx, name).await,
        },

        Commands::Tree { services, connections } => tree::show(ctx, *services, *connections).await,

        Commands::Completion { shell } => completion(shell),
    }
}

fn completion(shell: &crate::cli::Shell) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{Generator, generate};

    let mut cmd = crate::cli::Cli::command();

    fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
        let name = cmd.get_name().to_string();
        generate(generator, cmd, name, &mut std::io::stdout());
    }

    match shell {
        crate::cli::Shell::Bash => print_completions(clap_complete::shells::Bash, &mut cmd),
        crate::cli::Shell::Zsh => print_completions(clap_complete::shells::Zsh, &mut cmd),
        crate::cli::Shell::Fish => print_completions(clap_complete::shells::Fish, &mut cmd),
        crate::cli::Shell::PowerShell => {
            print_completions(clap_complete::shells::PowerShell, &mut cmd)
        },
    }

    Ok(())
}
