use std::sync::Arc;

use crate::error::Result;
use crate::executor::EpinioExecutor;

/// A service seen from an application.
#[derive(Debug, Clone)]
pub struct Service {
    namespace: String,
    application: String,
    name: String,
    bound: bool,
    executor: Arc<EpinioExecutor>,
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace
            && self.application == other.application
            && self.name == other.name
    }
}

impl Eq for Service {}

impl Service {
    /// A service in `namespace`, as seen from `application`.
    pub fn new(
        namespace: impl Into<String>,
        application: impl Into<String>,
        name: impl Into<String>,
        bound: bool,
        executor: Arc<EpinioExecutor>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            application: application.into(),
            name: name.into(),
            bound,
            executor,
        }
    }

    /// Service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning application.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether the service was bound to the application when listed.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Bind to the owning application.
    pub async fn bind(&self) -> Result<()> {
        self.executor.bind_service(&self.namespace, &self.name, &self.application).await
    }

    /// Unbind from the owning application.
    pub async fn unbind(&self) -> Result<()> {
        self.executor.unbind_service(&self.namespace, &self.name, &self.application).await
    }

    /// Delete the service.
    pub async fn delete(&self) -> Result<()> {
        self.executor.delete_service(&self.namespace, &self.name).await
    }
}
