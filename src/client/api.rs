//! Epinio HTTP API client.
//!
//! Used for namespace and application listing (and namespace creation) when
//! the active connection config names an API endpoint. Results are converted
//! to the same records the CLI path produces.
//!
//! TLS certificate validation is disabled for this client: Epinio
//! installations commonly run with self-signed certificates. This is a
//! standing risk, not a handled error.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::model::{AppRecord, NamespaceRecord};

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Namespace as returned by `GET /api/v1/namespaces`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiNamespace {
    /// Namespace name.
    pub name: String,
    /// Applications in the namespace.
    #[serde(default)]
    pub apps: Option<Vec<String>>,
}

impl From<ApiNamespace> for NamespaceRecord {
    fn from(ns: ApiNamespace) -> Self {
        NamespaceRecord { name: ns.name, apps: ns.apps.unwrap_or_default() }
    }
}

/// Application metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAppMeta {
    /// Application name.
    pub name: String,
    /// Owning namespace.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Application configuration block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAppConfiguration {
    /// Desired instance count.
    #[serde(default)]
    pub instances: Option<u32>,
    /// Routes.
    #[serde(default)]
    pub routes: Vec<String>,
}

/// Application deployment block (present when the app has a workload).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAppDeployment {
    /// Replicas requested.
    #[serde(default)]
    pub desiredreplicas: u32,
    /// Replicas ready.
    #[serde(default)]
    pub readyreplicas: u32,
}

/// Application as returned by `GET /api/v1/namespaces/{ns}/applications`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiApplication {
    /// Metadata.
    pub meta: ApiAppMeta,
    /// Configuration.
    #[serde(default)]
    pub configuration: ApiAppConfiguration,
    /// Deployment, when running.
    #[serde(default)]
    pub deployment: Option<ApiAppDeployment>,
}

impl From<ApiApplication> for AppRecord {
    fn from(app: ApiApplication) -> Self {
        // Same `<ready>/<desired>` shape the CLI prints in its STATUS column.
        let status = match &app.deployment {
            Some(d) => format!("{}/{}", d.readyreplicas, d.desiredreplicas),
            None => "inactive".to_string(),
        };
        AppRecord {
            name: app.meta.name,
            status: Some(status),
            routes: app.configuration.routes,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateNamespace<'a> {
    name: &'a str,
}

/// Client for the Epinio REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    user: Option<String>,
    pass: Option<String>,
}

impl ApiClient {
    /// Create a client for `base` with optional basic-auth credentials.
    pub fn new(base: &str, user: Option<String>, pass: Option<String>) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::config(format!("Invalid API URL '{}': {}", base, e)))?;

        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        debug!(api = %base, "API client built with TLS certificate validation disabled");

        Ok(Self { http, base, user, pass })
    }

    /// Create a client from a connection config, if it names an API endpoint.
    pub fn from_connection(config: &ConnectionConfig) -> Result<Option<Self>> {
        config
            .api()
            .map(|api| {
                Self::new(api, config.user().map(String::from), config.pass().map(String::from))
            })
            .transpose()
    }

    /// Base URL of the API.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build `<base>/api/v1/<segments...>`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("API URL '{}' cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.user {
            Some(user) => request.basic_auth(user, self.pass.as_deref()),
            None => request,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let response = self.authorize(self.http.get(url)).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// List namespaces.
    pub async fn namespaces(&self) -> Result<Vec<NamespaceRecord>> {
        let namespaces: Vec<ApiNamespace> = self.get_json(&["namespaces"]).await?;
        Ok(namespaces.into_iter().map(NamespaceRecord::from).collect())
    }

    /// List applications in a namespace.
    pub async fn applications(&self, namespace: &str) -> Result<Vec<AppRecord>> {
        let apps: Vec<ApiApplication> =
            self.get_json(&["namespaces", namespace, "applications"]).await?;
        Ok(apps.into_iter().map(AppRecord::from).collect())
    }

    /// Create a namespace.
    pub async fn create_namespace(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&["namespaces"])?;
        debug!(%url, name, "POST");
        self.authorize(self.http.post(url))
            .json(&CreateNamespace { name })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let client = ApiClient::new("https://epinio.example.com", None, None).unwrap();
        assert_eq!(
            client.endpoint(&["namespaces"]).unwrap().as_str(),
            "https://epinio.example.com/api/v1/namespaces"
        );

        let nested = ApiClient::new("https://host/prefix/", None, None).unwrap();
        assert_eq!(
            nested.endpoint(&["namespaces", "my ns", "applications"]).unwrap().as_str(),
            "https://host/prefix/api/v1/namespaces/my%20ns/applications"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(ApiClient::new("not a url", None, None), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_connection_without_api() {
        let config = ConnectionConfig::from_yaml("user: admin\n", Vec::new()).unwrap();
        assert!(ApiClient::from_connection(&config).unwrap().is_none());
    }

    #[test]
    fn test_namespace_json_normalization() {
        let json = r#"[{"name": "workspace", "apps": ["web"]}, {"name": "empty", "apps": null}]"#;
        let records: Vec<NamespaceRecord> = serde_json::from_str::<Vec<ApiNamespace>>(json)
            .unwrap()
            .into_iter()
            .map(NamespaceRecord::from)
            .collect();
        assert_eq!(records[0].name, "workspace");
        assert_eq!(records[0].apps, vec!["web".to_string()]);
        assert!(records[1].apps.is_empty());
    }

    #[test]
    fn test_application_json_normalization() {
        let json = r#"[
            {"meta": {"name": "web", "namespace": "workspace"},
             "configuration": {"instances": 2, "routes": ["web.example.io"]},
             "deployment": {"desiredreplicas": 2, "readyreplicas": 1}},
            {"meta": {"name": "idle"}}
        ]"#;
        let apps: Vec<AppRecord> = serde_json::from_str::<Vec<ApiApplication>>(json)
            .unwrap()
            .into_iter()
            .map(AppRecord::from)
            .collect();

        assert_eq!(apps[0].name, "web");
        assert_eq!(apps[0].status.as_deref(), Some("1/2"));
        assert!(apps[0].is_healthy());
        assert_eq!(apps[0].routes, vec!["web.example.io".to_string()]);

        assert_eq!(apps[1].status.as_deref(), Some("inactive"));
        assert!(!apps[1].is_healthy());
    }
}
