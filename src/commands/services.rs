//! Service commands.

use crate::client::Context;
use crate::error::Result;
use crate::model::{Application, ServiceRecord};
use crate::output::Displayable;

impl Displayable for ServiceRecord {
    const HEADERS: &'static [&'static str] = &["NAME", "APPLICATIONS"];

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.applications.join(", ")]
    }
}

/// List services in the current namespace.
pub async fn list(ctx: &Context) -> Result<()> {
    let namespace = ctx.namespace()?;
    let services = ctx.executor.list_services(&namespace).await?;

    if services.is_empty() {
        ctx.output.info(&format!("No services in namespace '{namespace}'."));
        return Ok(());
    }

    ctx.output.list(&services)
}

/// Bind a service to an application.
pub async fn bind(ctx: &Context, service: &str, app: &str) -> Result<()> {
    let mut app = Application::new(ctx.namespace()?, app, ctx.executor.clone());
    app.bind(service).await?;
    ctx.output.success(&format!("Bound {} to {}", service, app.name()));
    Ok(())
}

/// Unbind a service from an application.
pub async fn unbind(ctx: &Context, service: &str, app: &str) -> Result<()> {
    let mut app = Application::new(ctx.namespace()?, app, ctx.executor.clone());
    app.unbind(service).await?;
    ctx.output.success(&format!("Unbound {} from {}", service, app.name()));
    Ok(())
}

/// Delete a service.
pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    let namespace = ctx.namespace()?;

    if !ctx.confirm(&format!("Delete service '{name}' in '{namespace}'?"))? {
        ctx.output.info("Cancelled.");
        return Ok(());
    }

    ctx.executor.delete_service(&namespace, name).await?;
    ctx.output.success(&format!("Deleted service {name}"));
    Ok(())
}
