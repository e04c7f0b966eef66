use std::path::Path;
use std::sync::Arc;

use super::application::Application;
use super::cache::Cache;
use crate::error::Result;
use crate::executor::EpinioExecutor;

/// An Epinio namespace and its cached applications.
#[derive(Debug, Clone)]
pub struct Namespace {
    name: String,
    executor: Arc<EpinioExecutor>,
    applications: Cache<Application>,
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Namespace {}

impl Namespace {
    /// A namespace with nothing loaded.
    pub fn new(name: impl Into<String>, executor: Arc<EpinioExecutor>) -> Self {
        Self { name: name.into(), executor, applications: Cache::new() }
    }

    /// List all namespaces.
    pub async fn list(executor: &Arc<EpinioExecutor>) -> Result<Vec<Self>> {
        let records = executor.list_namespaces().await?;
        Ok(records.into_iter().map(|r| Self::new(r.name, Arc::clone(executor))).collect())
    }

    /// Namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The application cache.
    pub fn cache(&self) -> &Cache<Application> {
        &self.applications
    }

    /// Applications, loading them when the cache is unloaded, stale or
    /// empty, or when `force` is set.
    pub async fn applications(&mut self, force: bool) -> Result<&[Application]> {
        if self.applications.needs_load(force) {
            self.refresh_applications().await?;
        }
        Ok(self.applications.items())
    }

    /// Reload the application list, replacing the cache.
    pub async fn refresh_applications(&mut self) -> Result<()> {
        let records = self.executor.list_applications(&self.name).await?;
        let apps = records
            .into_iter()
            .map(|record| Application::from_record(&self.name, record, Arc::clone(&self.executor)))
            .collect();
        self.applications.replace(apps);
        Ok(())
    }

    /// Create this namespace.
    pub async fn create(&self) -> Result<()> {
        self.executor.create_namespace(&self.name).await
    }

    /// Delete this namespace.
    pub async fn delete(&self) -> Result<()> {
        self.executor.delete_namespace(&self.name).await
    }

    /// Push an application into this namespace from a directory or manifest.
    pub async fn push(&mut self, app: &str, source: &Path) -> Result<()> {
        self.executor.push_source(&self.name, app, source).await?;
        self.applications.invalidate();
        Ok(())
    }

    /// Delete an application in this namespace.
    pub async fn delete_application(&mut self, app: &str) -> Result<()> {
        self.executor.delete_application(&self.name, app).await?;
        self.applications.invalidate();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::executor::EpinioCommand;
    use crate::executor::testing::{FakeRunner, executor, state_with};

    #[tokio::test]
    async fn test_applications_are_cached_until_forced() {
        let lists = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&lists);
        let runner = FakeRunner::new(move |command| match command {
            EpinioCommand::AppList => {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("| NAME | STATUS |\n---\n| web | 1/1 |\n".to_string())
            },
            _ => Ok(String::new()),
        });
        let (exec, _) = executor(runner, state_with(&["/cfg/a.yaml"]));
        let mut ns = Namespace::new("workspace", Arc::new(exec));

        assert_eq!(ns.applications(false).await.unwrap().len(), 1);
        ns.applications(false).await.unwrap();
        assert_eq!(lists.load(Ordering::SeqCst), 1);

        ns.applications(true).await.unwrap();
        assert_eq!(lists.load(Ordering::SeqCst), 2);

        ns.delete_application("web").await.unwrap();
        ns.applications(false).await.unwrap();
        assert_eq!(lists.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_list_builds_namespaces() {
        let runner = FakeRunner::new(|command| match command {
            EpinioCommand::NamespaceList => {
                Ok("NAME | CREATED | APPLICATIONS\n---\na | now |\nb | now | web\n".to_string())
            },
            _ => Ok(String::new()),
        });
        let (exec, _) = executor(runner, state_with(&["/cfg/a.yaml"]));
        let exec = Arc::new(exec);

        let namespaces = Namespace::list(&exec).await.unwrap();
        assert_eq!(namespaces, vec![
            Namespace::new("a", Arc::clone(&exec)),
            Namespace::new("b", Arc::clone(&exec)),
        ]);
    }
}
