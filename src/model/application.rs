use std::path::Path;
use std::sync::Arc;

use super::cache::Cache;
use super::record::AppRecord;
use super::service::Service;
use crate::error::Result;
use crate::executor::{EnvAssignment, EpinioExecutor, Prompter};

/// An application in a namespace.
///
/// Health and URL are queried from the backend on every call. The status
/// seen when the application was listed is kept for display only.
#[derive(Debug, Clone)]
pub struct Application {
    namespace: String,
    name: String,
    listed: Option<AppRecord>,
    executor: Arc<EpinioExecutor>,
    services: Cache<Service>,
}

impl PartialEq for Application {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

impl Eq for Application {}

impl Application {
    /// An application known only by name.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        executor: Arc<EpinioExecutor>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            listed: None,
            executor,
            services: Cache::new(),
        }
    }

    pub(crate) fn from_record(
        namespace: &str,
        record: AppRecord,
        executor: Arc<EpinioExecutor>,
    ) -> Self {
        let mut app = Self::new(namespace, record.name.clone(), executor);
        app.listed = Some(record);
        app
    }

    /// Application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The record this application was built from, if it came from a list.
    pub fn listed(&self) -> Option<&AppRecord> {
        self.listed.as_ref()
    }

    /// Whether the application is pushed and has a running instance.
    pub async fn is_healthy(&self) -> Result<bool> {
        self.executor.is_application_healthy(&self.namespace, &self.name).await
    }

    /// Public URL.
    pub async fn url(&self) -> Result<String> {
        self.executor.application_url(&self.namespace, &self.name).await
    }

    /// Namespace as reported by the backend.
    pub async fn reported_namespace(&self) -> Result<String> {
        self.executor.application_namespace(&self.namespace, &self.name).await
    }

    /// Raw `app show` output.
    pub async fn show(&self) -> Result<String> {
        self.executor.show_application(&self.namespace, &self.name).await
    }

    /// Services in the application's namespace, cached.
    pub async fn services(&mut self, force: bool) -> Result<&[Service]> {
        if self.services.needs_load(force) {
            self.refresh_services().await?;
        }
        Ok(self.services.items())
    }

    /// Reload the service list, replacing the cache.
    pub async fn refresh_services(&mut self) -> Result<()> {
        let records = self.executor.list_services(&self.namespace).await?;
        let services = records
            .into_iter()
            .map(|record| {
                let bound = record.is_bound_to(&self.name);
                Service::new(&self.namespace, &self.name, record.name, bound, Arc::clone(&self.executor))
            })
            .collect();
        self.services.replace(services);
        Ok(())
    }

    /// Push from a directory or manifest.
    pub async fn push(&self, source: &Path) -> Result<()> {
        self.executor.push_source(&self.namespace, &self.name, source).await
    }

    /// Push again from the last recorded source.
    pub async fn repush(&self) -> Result<()> {
        self.executor.repush(&self.namespace, &self.name).await
    }

    /// Scale to `instances`.
    pub async fn scale(&self, instances: u32) -> Result<()> {
        self.executor.scale(&self.namespace, &self.name, instances).await
    }

    /// Set an environment variable.
    pub async fn set_env(&self, env: &EnvAssignment) -> Result<()> {
        self.executor.set_env(&self.namespace, &self.name, env).await
    }

    /// Ask for an environment assignment, then set it.
    pub async fn set_env_interactive(&self, prompter: &dyn Prompter) -> Result<EnvAssignment> {
        self.executor.set_env_interactive(&self.namespace, &self.name, prompter).await
    }

    /// Fetch logs.
    pub async fn logs(&self) -> Result<String> {
        self.executor.logs(&self.namespace, &self.name).await
    }

    /// Open in a browser. Returns the URL opened.
    pub async fn open(&self) -> Result<String> {
        self.executor.open(&self.namespace, &self.name).await
    }

    /// Delete the application.
    pub async fn delete(&self) -> Result<()> {
        self.executor.delete_application(&self.namespace, &self.name).await
    }

    /// Bind `service` to this application.
    pub async fn bind(&mut self, service: &str) -> Result<()> {
        self.executor.bind_service(&self.namespace, service, &self.name).await?;
        self.services.invalidate();
        Ok(())
    }

    /// Unbind `service` from this application.
    pub async fn unbind(&mut self, service: &str) -> Result<()> {
        self.executor.unbind_service(&self.namespace, service, &self.name).await?;
        self.services.invalidate();
        Ok(())
    }
}
