use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::executor::EpinioExecutor;

/// A stored connection config file.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    name: PathBuf,
    active: bool,
    executor: Arc<EpinioExecutor>,
}

impl PartialEq for ClusterConfig {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.active == other.active
    }
}

impl Eq for ClusterConfig {}

impl ClusterConfig {
    /// All stored connections, in stored order.
    pub fn list(executor: &Arc<EpinioExecutor>) -> Result<Vec<Self>> {
        let state = executor.connections()?;
        Ok(state
            .clusters()
            .iter()
            .map(|info| Self {
                name: info.config.path.clone(),
                active: info.config.active,
                executor: Arc::clone(executor),
            })
            .collect())
    }

    /// Config file path.
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Whether this is the active connection.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Make this the active connection.
    pub async fn set_active(&mut self) -> Result<()> {
        self.executor.activate_connection(&self.name).await?;
        self.active = true;
        Ok(())
    }

    /// Remove this connection.
    pub fn delete(&self) -> Result<()> {
        self.executor.delete_connection(&self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::executor::testing::{FakeRunner, executor, state_with};

    #[tokio::test]
    async fn test_switching_active_config() {
        let (exec, _) = executor(FakeRunner::ok(), state_with(&["/a.yaml", "/b.yaml", "/c.yaml"]));
        let exec = Arc::new(exec);

        let mut configs = ClusterConfig::list(&exec).unwrap();
        assert!(configs[0].is_active());
        configs[1].set_active().await.unwrap();

        let active: Vec<_> = ClusterConfig::list(&exec)
            .unwrap()
            .into_iter()
            .filter(ClusterConfig::is_active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name(), Path::new("/b.yaml"));
    }

    #[test]
    fn test_active_config_cannot_be_deleted() {
        let (exec, _) = executor(FakeRunner::ok(), state_with(&["/a.yaml", "/b.yaml"]));
        let exec = Arc::new(exec);

        let configs = ClusterConfig::list(&exec).unwrap();
        assert!(configs[0].delete().is_err());
        configs[1].delete().unwrap();
        assert_eq!(ClusterConfig::list(&exec).unwrap().len(), 1);
    }
}
