//! Connection management commands.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::client::Context;
use crate::error::{Error, Result};
use crate::model::ClusterConfig;
use crate::output::Displayable;

#[derive(Debug, Clone, Serialize)]
struct ConnectionRow {
    path: String,
    active: bool,
}

impl Displayable for ConnectionRow {
    const HEADERS: &'static [&'static str] = &["CONFIG", "ACTIVE"];

    fn row(&self) -> Vec<String> {
        vec![self.path.clone(), if self.active { "*".to_string() } else { String::new() }]
    }
}

/// Stored paths are absolute when the file exists.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn find(ctx: &Context, path: &Path) -> Result<ClusterConfig> {
    let path = resolve(path);
    ClusterConfig::list(&ctx.executor)?
        .into_iter()
        .find(|config| config.name() == path.as_path())
        .ok_or_else(|| {
            Error::invalid_arg(format!("Connection '{}' is not stored", path.display()))
        })
}

/// List stored connections.
pub fn list(ctx: &Context) -> Result<()> {
    let configs = ClusterConfig::list(&ctx.executor)?;

    if configs.is_empty() {
        ctx.output.info("No connections configured.");
        ctx.output.info("Run 'epinio-panel connections add <config-file>' to add one.");
        return Ok(());
    }

    let rows: Vec<ConnectionRow> = configs
        .iter()
        .map(|config| ConnectionRow {
            path: config.name().display().to_string(),
            active: config.is_active(),
        })
        .collect();

    ctx.output.list(&rows)
}

/// Add a connection.
pub async fn add(ctx: &Context, path: &Path) -> Result<()> {
    let path = resolve(path);
    if !path.is_file() {
        return Err(Error::invalid_arg(format!("Config file '{}' does not exist", path.display())));
    }

    let active = ctx.executor.add_connection(&path).await?;
    if active {
        ctx.output.success(&format!("Added and activated {}", path.display()));
    } else {
        ctx.output.success(&format!("Added {}", path.display()));
    }
    Ok(())
}

/// Make a stored connection the active one.
pub async fn activate(ctx: &Context, path: &Path) -> Result<()> {
    let mut config = find(ctx, path)?;
    if config.is_active() {
        ctx.output.info(&format!("{} is already active.", config.name().display()));
        return Ok(());
    }

    config.set_active().await?;
    ctx.output.success(&format!("Activated {}", config.name().display()));
    Ok(())
}

/// Remove a stored connection.
pub fn delete(ctx: &Context, path: &Path) -> Result<()> {
    let config = find(ctx, path)?;

    if !ctx.confirm(&format!("Remove connection '{}'?", config.name().display()))? {
        ctx.output.info("Cancelled.");
        return Ok(());
    }

    config.delete()?;
    ctx.output.success(&format!("Removed {}", config.name().display()));
    Ok(())
}
