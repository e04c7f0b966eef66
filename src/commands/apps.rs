//! Application commands.

use std::path::Path;

use serde::Serialize;

use crate::client::Context;
use crate::error::{Error, Result};
use crate::executor::{DEFAULT_CHANNEL, PresetInput, Prompter, input};
use crate::model::{AppRecord, Application, Namespace};
use crate::output::{Displayable, OutputFormat};
use crate::tui::{self, LinePrompter};

impl Displayable for AppRecord {
    const HEADERS: &'static [&'static str] = &["NAME", "STATUS", "ROUTES"];

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.clone().unwrap_or_else(|| "-".to_string()),
            self.routes.join(", "),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
struct HealthRow {
    name: String,
    namespace: String,
    healthy: bool,
}

impl Displayable for HealthRow {
    const HEADERS: &'static [&'static str] = &["NAME", "NAMESPACE", "HEALTH"];

    fn row(&self) -> Vec<String> {
        let status = if self.healthy { "healthy" } else { "not running" };
        vec![self.name.clone(), self.namespace.clone(), status.to_string()]
    }
}

#[derive(Debug, Clone, Serialize)]
struct AppDetails<'a> {
    name: &'a str,
    namespace: &'a str,
    details: &'a str,
}

fn application(ctx: &Context, name: &str) -> Result<Application> {
    Ok(Application::new(ctx.namespace()?, name, ctx.executor.clone()))
}

/// Answer from the command line when given, otherwise ask the operator.
fn prompter(ctx: &Context, preset: Option<&str>) -> Result<Box<dyn Prompter>> {
    match preset {
        Some(value) => Ok(Box::new(PresetInput::new(Some(value.to_string())))),
        None if tui::is_interactive(ctx) => Ok(Box::new(LinePrompter::stdio())),
        None => Err(Error::invalid_arg("A value is required when not running interactively")),
    }
}

/// List applications in the current namespace.
pub async fn list(ctx: &Context) -> Result<()> {
    let mut namespace = Namespace::new(ctx.namespace()?, ctx.executor.clone());
    let records: Vec<AppRecord> = namespace
        .applications(false)
        .await?
        .iter()
        .filter_map(|app| app.listed().cloned())
        .collect();

    if records.is_empty() {
        ctx.output.info(&format!("No applications in namespace '{}'.", namespace.name()));
        return Ok(());
    }

    ctx.output.list(&records)
}

/// Show application details.
pub async fn show(ctx: &Context, name: &str) -> Result<()> {
    let app = application(ctx, name)?;
    let details = app.show().await?;

    match ctx.output.format() {
        OutputFormat::Table => {
            ctx.output.text(&details);
            Ok(())
        },
        _ => ctx.output.value(&AppDetails {
            name: app.name(),
            namespace: app.namespace(),
            details: &details,
        }),
    }
}

/// Print the application URL.
pub async fn url(ctx: &Context, name: &str) -> Result<()> {
    let url = application(ctx, name)?.url().await?;
    ctx.output.line(&url);
    Ok(())
}

/// Report whether the application has a running instance.
pub async fn health(ctx: &Context, name: &str) -> Result<()> {
    let app = application(ctx, name)?;
    let healthy = app.is_healthy().await?;

    ctx.output.record(&HealthRow {
        name: app.name().to_string(),
        namespace: app.namespace().to_string(),
        healthy,
    })
}

/// Push an application from a directory or manifest.
pub async fn push(ctx: &Context, name: &str, path: &Path) -> Result<()> {
    let source = std::fs::canonicalize(path).map_err(|e| {
        Error::invalid_arg(format!("Cannot read source '{}': {}", path.display(), e))
    })?;
    let app = application(ctx, name)?;

    tui::spin_result(
        format!("Pushing {} to {}...", name, app.namespace()),
        format!("Pushed {name}"),
        app.push(&source),
    )
    .await
}

/// Push again from the recorded source.
pub async fn repush(ctx: &Context, name: &str) -> Result<()> {
    let app = application(ctx, name)?;
    tui::spin_result(format!("Pushing {name}..."), format!("Pushed {name}"), app.repush()).await
}

/// Scale an application.
pub async fn scale(ctx: &Context, name: &str, instances: Option<&str>) -> Result<()> {
    let app = application(ctx, name)?;
    let count = input::request_instances(prompter(ctx, instances)?.as_ref())?;

    tui::spin_result(
        format!("Scaling {name} to {count} instance(s)..."),
        format!("Scaled {name} to {count} instance(s)"),
        app.scale(count),
    )
    .await
}

/// Set an environment variable.
pub async fn env(ctx: &Context, name: &str, assignment: Option<&str>) -> Result<()> {
    let app = application(ctx, name)?;
    let prompter = prompter(ctx, assignment)?;

    let env = app.set_env_interactive(prompter.as_ref()).await?;
    ctx.output.success(&format!("Set {} on {}", env.key, name));
    Ok(())
}

/// Print application logs from the log channel.
pub async fn logs(ctx: &Context, name: &str) -> Result<()> {
    application(ctx, name)?.logs().await?;
    let logs = ctx.executor.channels().open(DEFAULT_CHANNEL).contents();
    ctx.output.text(&logs);
    if !logs.is_empty() && !logs.ends_with('\n') {
        ctx.output.line("");
    }
    Ok(())
}

/// Open the application in a browser.
pub async fn open(ctx: &Context, name: &str) -> Result<()> {
    let url = application(ctx, name)?.open().await?;
    ctx.output.success(&format!("Opened {url}"));
    Ok(())
}

/// Delete an application.
pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    let app = application(ctx, name)?;

    if !ctx.confirm(&format!("Delete application '{}' in '{}'?", name, app.namespace()))? {
        ctx.output.info("Cancelled.");
        return Ok(());
    }

    tui::spin_result(format!("Deleting {name}..."), format!("Deleted {name}"), app.delete()).await
}
