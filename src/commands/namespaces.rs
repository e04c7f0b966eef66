//! Namespace management commands.

use crate::client::Context;
use crate::error::Result;
use crate::model::{Namespace, NamespaceRecord};
use crate::output::Displayable;
use crate::tui;

impl Displayable for NamespaceRecord {
    const HEADERS: &'static [&'static str] = &["NAME", "APPLICATIONS"];

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.apps.join(", ")]
    }
}

/// List namespaces.
pub async fn list(ctx: &Context) -> Result<()> {
    let namespaces = ctx.executor.list_namespaces().await?;

    if namespaces.is_empty() {
        ctx.output.info("No namespaces found.");
        return Ok(());
    }

    ctx.output.list(&namespaces)
}

/// Create a namespace.
pub async fn create(ctx: &Context, name: &str) -> Result<()> {
    let namespace = Namespace::new(name, ctx.executor.clone());
    tui::spin_result(
        format!("Creating namespace {name}..."),
        format!("Created namespace {name}"),
        namespace.create(),
    )
    .await
}

/// Delete a namespace.
pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    if !ctx.confirm(&format!("Delete namespace '{name}' and all of its applications?"))? {
        ctx.output.info("Cancelled.");
        return Ok(());
    }

    let namespace = Namespace::new(name, ctx.executor.clone());
    tui::spin_result(
        format!("Deleting namespace {name}..."),
        format!("Deleted namespace {name}"),
        namespace.delete(),
    )
    .await
}
