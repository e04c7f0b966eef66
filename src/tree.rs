//! Tree composition.
//!
//! Maps domain entities to a generic node tree for display:
//!
//! ```text
//! Namespaces
//! └── workspace
//!     └── web [ workspace ] (healthy)
//!         └── db (bound)
//! ```
//!
//! Errors while loading a level become a single [`ResourceType::Message`]
//! node in place of that level's children.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::executor::EpinioExecutor;
use crate::model::{ClusterConfig, Namespace};

/// Node kinds, keyed by the context values menus attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceType {
    /// Informational leaf (empty list, load error).
    #[serde(rename = "epinio:message")]
    Message,
    /// Root of the namespace tree.
    #[serde(rename = "epinio:namespaces")]
    Namespaces,
    /// One namespace.
    #[serde(rename = "epinio:namespace")]
    Namespace,
    /// Group of applications.
    #[serde(rename = "epinio:applications")]
    Applications,
    /// One application.
    #[serde(rename = "epinio:application")]
    Application,
    /// Group of services.
    #[serde(rename = "epinio:services")]
    Services,
    /// One service.
    #[serde(rename = "epinio:service")]
    Service,
    /// Root of the connection tree.
    #[serde(rename = "epinio:configs")]
    Configs,
    /// One connection config.
    #[serde(rename = "epinio:config")]
    Config,
}

impl ResourceType {
    /// Context value string.
    pub fn context_value(self) -> &'static str {
        match self {
            Self::Message => "epinio:message",
            Self::Namespaces => "epinio:namespaces",
            Self::Namespace => "epinio:namespace",
            Self::Applications => "epinio:applications",
            Self::Application => "epinio:application",
            Self::Services => "epinio:services",
            Self::Service => "epinio:service",
            Self::Configs => "epinio:configs",
            Self::Config => "epinio:config",
        }
    }
}

/// A display node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Main text.
    pub label: String,
    /// Node kind.
    pub kind: ResourceType,
    /// Secondary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Health marker, for applications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy: Option<bool>,
    /// Children, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// A leaf node.
    pub fn new(label: impl Into<String>, kind: ResourceType) -> Self {
        Self { label: label.into(), kind, description: None, healthy: None, children: Vec::new() }
    }

    /// A message leaf.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(text, ResourceType::Message)
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the children.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Build the connection tree.
pub fn configs_tree(configs: &[ClusterConfig]) -> TreeNode {
    let children = if configs.is_empty() {
        vec![TreeNode::message("No connections. Add one with `epinio-panel connections add`")]
    } else {
        configs
            .iter()
            .map(|config| {
                let node = TreeNode::new(config.name().display().to_string(), ResourceType::Config);
                if config.is_active() { node.with_description("active") } else { node }
            })
            .collect()
    };

    TreeNode::new("Configs", ResourceType::Configs).with_children(children)
}

/// Build the namespace tree: namespaces, their applications and, when
/// `with_services` is set, each application's services.
pub async fn namespaces_tree(executor: &Arc<EpinioExecutor>, with_services: bool) -> TreeNode {
    let root = TreeNode::new("Namespaces", ResourceType::Namespaces);

    let namespaces = match Namespace::list(executor).await {
        Ok(namespaces) if namespaces.is_empty() => {
            return root.with_children(vec![TreeNode::message("No namespaces found")]);
        },
        Ok(namespaces) => namespaces,
        Err(e) => {
            debug!(error = %e, "namespace listing failed");
            return root.with_children(vec![TreeNode::message(e.to_string())]);
        },
    };

    let mut children = Vec::with_capacity(namespaces.len());
    for mut namespace in namespaces {
        let node = TreeNode::new(namespace.name(), ResourceType::Namespace);
        let apps = namespace_children(&mut namespace, with_services).await;
        children.push(node.with_children(apps));
    }

    root.with_children(children)
}

async fn namespace_children(namespace: &mut Namespace, with_services: bool) -> Vec<TreeNode> {
    let name = namespace.name().to_string();
    let apps = match namespace.applications(false).await {
        Ok(apps) => apps.to_vec(),
        Err(e) => return vec![TreeNode::message(e.to_string())],
    };

    let mut nodes = Vec::with_capacity(apps.len());
    for mut app in apps {
        let mut node = TreeNode::new(app.name(), ResourceType::Application)
            .with_description(format!("[ {} ]", name));
        node.healthy = Some(app.listed().is_some_and(|record| record.is_healthy()));

        if with_services {
            node.children = match app.services(false).await {
                Ok(services) => services
                    .iter()
                    .map(|service| {
                        let leaf = TreeNode::new(service.name(), ResourceType::Service);
                        if service.is_bound() { leaf.with_description("bound") } else { leaf }
                    })
                    .collect(),
                Err(e) => vec![TreeNode::message(e.to_string())],
            };
        }
        nodes.push(node);
    }
    nodes
}

/// Render a tree with box-drawing guides.
pub fn render(root: &TreeNode) -> String {
    let mut out = String::new();
    out.push_str(&node_line(root));
    out.push('\n');
    render_children(&root.children, "", &mut out);
    out
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&node_line(child));
        out.push('\n');
        render_children(&child.children, &format!("{}{}", prefix, indent), out);
    }
}

fn node_line(node: &TreeNode) -> String {
    let mut line = node.label.clone();
    if let Some(description) = &node.description {
        line.push(' ');
        line.push_str(description);
    }
    match node.healthy {
        Some(true) => line.push_str(" (healthy)"),
        Some(false) => line.push_str(" (not running)"),
        None => {},
    }
    line
}
