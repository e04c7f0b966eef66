//! Resource tree command.

use crate::client::Context;
use crate::error::Result;
use crate::model::ClusterConfig;
use crate::output::OutputFormat;
use crate::{tree, tui};

/// Print the namespace tree, or the connection tree.
pub async fn show(ctx: &Context, with_services: bool, connections: bool) -> Result<()> {
    let root = if connections {
        tree::configs_tree(&ClusterConfig::list(&ctx.executor)?)
    } else if tui::is_interactive(ctx) {
        tui::spin("Loading namespaces...", tree::namespaces_tree(&ctx.executor, with_services)).await
    } else {
        tree::namespaces_tree(&ctx.executor, with_services).await
    };

    match ctx.output.format() {
        OutputFormat::Table => {
            ctx.output.text(&tree::render(&root));
            Ok(())
        },
        _ => ctx.output.value(&root),
    }
}
