//! Normalized list records.
//!
//! The CLI and HTTP API report resources in different shapes; both are
//! reduced to these records before entities are built from them.

use serde::Serialize;

use crate::parse::{self, Column, ParsedRow};

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn row_name(row: &ParsedRow) -> Option<String> {
    row.name().filter(|name| !name.is_empty()).map(String::from)
}

/// A namespace and the applications it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceRecord {
    /// Namespace name.
    pub name: String,
    /// Application names.
    pub apps: Vec<String>,
}

impl NamespaceRecord {
    /// Columns of `namespace list`.
    pub const EXPECTED: &'static [Column] = &[Column::Name, Column::Applications];

    /// Build from a `namespace list` row. Rows without a name are skipped.
    pub fn from_row(row: &ParsedRow) -> Option<Self> {
        Some(Self { name: row_name(row)?, apps: split_list(row.get(&Column::Applications)) })
    }
}

/// An application as listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRecord {
    /// Application name.
    pub name: String,
    /// `inactive` or `<running>/<total>`.
    pub status: Option<String>,
    /// Routes, in listed order.
    pub routes: Vec<String>,
}

impl AppRecord {
    /// Columns of `app list`.
    pub const EXPECTED: &'static [Column] = &[Column::Name, Column::Status, Column::Routes];

    /// Build from an `app list` row. Rows without a name are skipped.
    pub fn from_row(row: &ParsedRow) -> Option<Self> {
        Some(Self {
            name: row_name(row)?,
            status: row.status().filter(|s| !s.is_empty()).map(String::from),
            routes: split_list(row.get(&Column::Routes)),
        })
    }

    /// Whether at least one instance is running.
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref().is_some_and(parse::is_status_healthy)
    }
}

/// A service and the applications bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    /// Service name.
    pub name: String,
    /// Bound application names.
    pub applications: Vec<String>,
}

impl ServiceRecord {
    /// Columns of `service list`.
    pub const EXPECTED: &'static [Column] = &[Column::Name, Column::Applications];

    /// Build from a `service list` row. Rows without a name are skipped.
    pub fn from_row(row: &ParsedRow) -> Option<Self> {
        Some(Self {
            name: row_name(row)?,
            applications: split_list(row.get(&Column::Applications)),
        })
    }

    /// Whether `app` is bound to this service.
    pub fn is_bound_to(&self, app: &str) -> bool {
        self.applications.iter().any(|a| a == app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_record_from_row() {
        let row = ParsedRow::from_pairs([
            ("name", "web"),
            ("status", "2/2"),
            ("routes", "web.example.io, web.alt.io"),
        ]);
        let app = AppRecord::from_row(&row);
        assert_eq!(
            app,
            Some(AppRecord {
                name: "web".into(),
                status: Some("2/2".into()),
                routes: vec!["web.example.io".into(), "web.alt.io".into()],
            })
        );
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let row = ParsedRow::from_pairs([("status", "1/1")]);
        assert!(AppRecord::from_row(&row).is_none());
        let blank = ParsedRow::from_pairs([("name", "")]);
        assert!(NamespaceRecord::from_row(&blank).is_none());
    }

    #[test]
    fn test_missing_status_is_unhealthy() {
        let app = AppRecord::from_row(&ParsedRow::from_pairs([("name", "web")]));
        assert!(app.is_some_and(|a| !a.is_healthy()));
    }

    #[test]
    fn test_service_bindings() {
        let row = ParsedRow::from_pairs([("name", "db"), ("applications", "web,worker")]);
        let service = ServiceRecord::from_row(&row);
        assert!(service.as_ref().is_some_and(|s| s.is_bound_to("worker")));
        assert!(service.is_some_and(|s| !s.is_bound_to("api")));
    }
}
