//! Epinio connection config files.
//!
//! An Epinio CLI config file is YAML with the API endpoint and credentials:
//!
//! ```yaml
//! api: https://epinio.example.com
//! user: admin
//! pass: ${EPINIO_PASSWORD}
//! namespace: workspace
//! ```
//!
//! Nested keys are flattened with `.` and `${NAME}` placeholders are expanded
//! from the file's own keys and the process environment (environment wins).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::{Error, Result};

/// Flattened, template-expanded contents of a connection config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ConnectionConfig {
    /// Read and expand a connection config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read connection config {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml(&contents, std::env::vars())?;
        config.path = path.to_path_buf();
        Ok(config)
    }

    /// Parse YAML contents, expanding placeholders against `env`.
    pub fn from_yaml<I>(contents: &str, env: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let document: Value = serde_yaml::from_str(contents)?;

        let mut values = BTreeMap::new();
        flatten(&document, None, &mut values);

        let mut variables = values.clone();
        variables.extend(env);

        let values = values
            .into_iter()
            .map(|(k, v)| (k, expand(&v, &variables)))
            .collect();

        Ok(Self { path: PathBuf::new(), values })
    }

    /// Path the config was loaded from (empty when parsed from a string).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a flattened key such as `api` or `settings.colors`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// API base URL.
    pub fn api(&self) -> Option<&str> {
        self.get("api")
    }

    /// Basic-auth user.
    pub fn user(&self) -> Option<&str> {
        self.get("user")
    }

    /// Basic-auth password.
    pub fn pass(&self) -> Option<&str> {
        self.get("pass")
    }

    /// Namespace the CLI targets by default.
    pub fn namespace(&self) -> Option<&str> {
        self.get("namespace")
    }
}

fn flatten(value: &Value, prefix: Option<&str>, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let Some(key) = scalar_to_string(k) else {
                    continue;
                };
                let key = match prefix {
                    Some(p) => format!("{}.{}", p, key),
                    None => key,
                };
                flatten(v, Some(&key), out);
            }
        },
        Value::Sequence(items) => {
            for (i, v) in items.iter().enumerate() {
                let key = match prefix {
                    Some(p) => format!("{}.{}", p, i),
                    None => i.to_string(),
                };
                flatten(v, Some(&key), out);
            }
        },
        Value::Tagged(tagged) => flatten(&tagged.value, prefix, out),
        scalar => {
            if let (Some(key), Some(text)) = (prefix, scalar_to_string(scalar)) {
                out.insert(key.to_string(), text);
            }
        },
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Replace `${NAME}` placeholders. Unknown names are left untouched.
fn expand(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if !after[..end].contains('{') => {
                let name = &after[..end];
                match variables.get(name) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            },
            _ => {
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}
