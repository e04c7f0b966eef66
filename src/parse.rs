//! Parsing of Epinio CLI output.
//!
//! The Epinio CLI prints list views as pipe-delimited tables:
//!
//! ```text
//! | NAME    | CREATED              | STATUS | ROUTES            |
//! |---------|----------------------|--------|-------------------|
//! | sample  | 2023-01-01 10:00:00  | 1/1    | sample.example.io |
//! ```
//!
//! and detail views either as a `KEY | VALUE` table or as `Key: value` lines.
//! This module turns both shapes into [`ParsedRow`]s and extracts the few
//! derived values the panel needs (application health, namespace, routes).

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};

/// Column separator used by Epinio table output.
pub const COLUMN_SEPARATOR: char = '|';

/// A column of Epinio table output.
///
/// The columns the panel reads are named; anything else is kept verbatim
/// (lower-cased) in [`Column::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// `NAME`
    Name,
    /// `NAMESPACE`
    Namespace,
    /// `STATUS`
    Status,
    /// `CREATED`
    Created,
    /// `ROUTES`
    Routes,
    /// `DOMAIN`
    Domain,
    /// `KEY` (detail tables)
    Key,
    /// `VALUE` (detail tables)
    Value,
    /// `CONFIGURATIONS`
    Configurations,
    /// `APPLICATIONS`
    Applications,
    /// Any other header, lower-cased and trimmed.
    Other(String),
}

impl Column {
    /// Map a raw header cell to a column. The header is lower-cased and trimmed.
    pub fn from_header(header: &str) -> Self {
        let header = header.trim().to_lowercase();
        match header.as_str() {
            "name" => Self::Name,
            "namespace" => Self::Namespace,
            "status" => Self::Status,
            "created" => Self::Created,
            "routes" => Self::Routes,
            "domain" => Self::Domain,
            "key" => Self::Key,
            "value" => Self::Value,
            "configurations" => Self::Configurations,
            "applications" => Self::Applications,
            _ => Self::Other(header),
        }
    }

    /// The lower-cased header text for this column.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::Namespace => "namespace",
            Self::Status => "status",
            Self::Created => "created",
            Self::Routes => "routes",
            Self::Domain => "domain",
            Self::Key => "key",
            Self::Value => "value",
            Self::Configurations => "configurations",
            Self::Applications => "applications",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal mismatch between a row and the columns a caller expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowWarning {
    /// An expected column has no value in the row.
    Missing(Column),
    /// The row carries a column the caller did not ask for.
    Unexpected(Column),
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(c) => write!(f, "missing column '{}'", c),
            Self::Unexpected(c) => write!(f, "unexpected column '{}'", c),
        }
    }
}

/// One structured record derived from one line of tabular CLI output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRow {
    fields: BTreeMap<Column, String>,
}

impl ParsedRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(header, value)` pairs. Values are trimmed.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(Column::from_header(k.as_ref()), v.as_ref());
        }
        row
    }

    /// Set a column value (trimmed).
    pub fn insert(&mut self, column: Column, value: &str) {
        self.fields.insert(column, value.trim().to_string());
    }

    /// Get a column value.
    pub fn get(&self, column: &Column) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// The `name` column.
    pub fn name(&self) -> Option<&str> {
        self.get(&Column::Name)
    }

    /// The `status` column.
    pub fn status(&self) -> Option<&str> {
        self.get(&Column::Status)
    }

    /// Number of columns set in this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no column is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the set columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.fields.keys()
    }

    /// Compare the row against the columns a caller expects.
    ///
    /// Returns one warning per missing or unexpected column. An empty result
    /// means the row matches exactly.
    pub fn validate(&self, expected: &[Column]) -> Vec<RowWarning> {
        let mut warnings: Vec<RowWarning> = expected
            .iter()
            .filter(|c| !self.fields.contains_key(c))
            .cloned()
            .map(RowWarning::Missing)
            .collect();

        warnings.extend(
            self.fields
                .keys()
                .filter(|c| !expected.contains(c))
                .cloned()
                .map(RowWarning::Unexpected),
        );

        warnings
    }
}

impl Serialize for ParsedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column.as_str(), value)?;
        }
        map.end()
    }
}

/// Split raw command output into non-empty lines.
///
/// Runs of `\r` and `\n` count as one break; blank lines are dropped.
pub fn split_lines(output: &str) -> Vec<String> {
    output
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn header_line_index<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    lines.iter().position(|line| line.as_ref().matches(COLUMN_SEPARATOR).count() > 1)
}

fn parse_line(line: &str, headers: &[Column]) -> ParsedRow {
    let mut row = ParsedRow::new();
    // Fields beyond the header count are dropped by the zip.
    for (column, value) in headers.iter().zip(line.split(COLUMN_SEPARATOR)) {
        row.insert(column.clone(), value);
    }
    row
}

/// Parse pipe-delimited table lines into rows.
///
/// The header is the first line with more than one column separator, so a
/// stray `|` in a preamble line is not mistaken for a table. Exactly one line
/// after the header is skipped as the separator line; every following line
/// is a data row. If the backend ever omits the separator line, the first
/// data row is dropped.
///
/// Returns an empty list when no header line exists, which is how empty
/// lists and non-tabular output are reported.
pub fn parse_table_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedRow> {
    let Some(header_index) = header_line_index(lines) else {
        return Vec::new();
    };

    let headers: Vec<Column> =
        lines[header_index].as_ref().split(COLUMN_SEPARATOR).map(Column::from_header).collect();

    lines
        .iter()
        .skip(header_index + 2)
        .map(|line| parse_line(line.as_ref(), &headers))
        .collect()
}

/// Parse raw command output (not yet split into lines) into rows.
pub fn parse_table(output: &str) -> Vec<ParsedRow> {
    parse_table_lines(&split_lines(output))
}

/// Decide whether an application status string means healthy.
///
/// Status is `inactive` or `<running>/<total>`; healthy iff
/// `total > 0 && running >= 1`. Anything unparsable is unhealthy.
pub fn is_status_healthy(status: &str) -> bool {
    if status.to_lowercase().contains("inactive") {
        return false;
    }

    let parts: Vec<&str> = status.split('/').collect();
    let [running, total] = parts.as_slice() else {
        return false;
    };

    match (running.trim().parse::<i64>(), total.trim().parse::<i64>()) {
        (Ok(running), Ok(total)) => total > 0 && running >= 1,
        _ => false,
    }
}

/// Decide whether an application row reports a healthy status.
///
/// A row without a `status` column is unhealthy.
pub fn is_application_healthy(row: &ParsedRow) -> bool {
    row.status().is_some_and(is_status_healthy)
}

/// Extract the namespace from `app show` output lines.
///
/// Takes the first line containing `Namespace` and returns the text after
/// its last `:`, trimmed.
pub fn namespace_field<S: AsRef<str>>(lines: &[S]) -> Result<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.contains("Namespace"))
        .and_then(|line| line.rsplit(':').next())
        .map(|value| value.trim().to_string())
        .ok_or_else(|| Error::FieldNotFound("Namespace".to_string()))
}

/// Extract a field from a detail view.
///
/// Looks first for a `KEY | VALUE` table row whose key matches (case
/// insensitive), then for a `Key: value` line.
pub fn detail_field<S: AsRef<str>>(lines: &[S], key: &str) -> Result<String> {
    let from_table = parse_table_lines(lines).into_iter().find_map(|row| {
        row.get(&Column::Key)
            .filter(|k| k.eq_ignore_ascii_case(key))
            .and_then(|_| row.get(&Column::Value).map(String::from))
    });

    if let Some(value) = from_table {
        return Ok(value);
    }

    lines
        .iter()
        .filter_map(|line| line.as_ref().split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim().to_string())
        .ok_or_else(|| Error::FieldNotFound(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const APP_LIST: &str = "\
✔️  Epinio Applications
| NAME    | CREATED                  | STATUS | ROUTES              |
|---------|--------------------------|--------|---------------------|
| sample  | 2023-01-01 10:00:00 UTC  | 1/1    | sample.example.io   |
| broken  | 2023-01-02 10:00:00 UTC  | 0/1    | broken.example.io   |
";

    #[test]
    fn test_parse_rows_and_columns() {
        let lines = vec!["NAME | STATUS | ROUTES", "-----", " a | 1/1 | a.io ", "b|0/1|b.io"];
        let rows = parse_table_lines(&lines);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(rows[0].name(), Some("a"));
        assert_eq!(rows[0].get(&Column::Routes), Some("a.io"));
        assert_eq!(rows[1].status(), Some("0/1"));
    }

    #[test]
    fn test_parse_bordered_table() {
        let rows = parse_table(APP_LIST);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name(), Some("sample"));
        assert_eq!(rows[1].name(), Some("broken"));
        // Leading and trailing borders produce empty header names.
        assert_eq!(rows[0].get(&Column::Other(String::new())), Some(""));
    }

    #[test]
    fn test_no_pipes_means_no_rows() {
        let lines = vec!["No applications in namespace", "nothing here"];
        assert!(parse_table_lines(&lines).is_empty());
        assert!(parse_table_lines::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_header_only_means_no_rows() {
        let lines = vec!["| NAME | STATUS |", "------"];
        assert!(parse_table_lines(&lines).is_empty());
    }

    #[test]
    fn test_missing_separator_drops_first_row() {
        let lines = vec!["| NAME | STATUS |", "| a | 1/1 |", "| b | 1/1 |"];
        let rows = parse_table_lines(&lines);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name(), Some("b"));
    }

    #[test]
    fn test_single_pipe_line_is_not_a_header() {
        let lines = vec!["Status: 1|2", "NAME | STATUS | ROUTES", "---", "web | 1/1 | web.io"];
        let rows = parse_table_lines(&lines);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name(), Some("web"));
        assert_eq!(rows[0].status(), Some("1/1"));
        assert_eq!(rows[0].get(&Column::Routes), Some("web.io"));

        assert!(parse_table_lines(&["KEY | VALUE", "---", "Name | web"]).is_empty());
    }

    #[test]
    fn test_short_and_long_rows() {
        let lines = vec!["NAME | STATUS | ROUTES", "---", "a | 1/1", "b | 1/1 | b.io | extra"];
        let rows = parse_table_lines(&lines);
        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].get(&Column::Routes).is_none());
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1].get(&Column::Routes), Some("b.io"));
    }

    #[test]
    fn test_split_lines_drops_blanks() {
        let lines = split_lines("a\r\n\r\nb\n\nc\r");
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_health() {
        let row = |s: &str| ParsedRow::from_pairs([("status", s)]);
        assert!(!is_application_healthy(&row("0/1")));
        assert!(is_application_healthy(&row("1/1")));
        assert!(is_application_healthy(&row("2/3")));
        assert!(!is_application_healthy(&row("inactive")));
        assert!(!is_application_healthy(&row("INACTIVE")));
        assert!(!is_application_healthy(&row("2/abc")));
        assert!(!is_application_healthy(&row("1/0")));
        assert!(!is_application_healthy(&row("1/1/1")));
        assert!(!is_application_healthy(&ParsedRow::new()));
    }

    #[test]
    fn test_namespace_field() {
        let lines = vec!["Name: foo", "Namespace: bar  "];
        assert_eq!(namespace_field(&lines).unwrap(), "bar");

        let missing = vec!["Name: foo"];
        assert!(matches!(namespace_field(&missing), Err(Error::FieldNotFound(f)) if f == "Namespace"));
    }

    #[test]
    fn test_detail_field_from_table() {
        let lines = vec![
            "| KEY       | VALUE             |",
            "|-----------|-------------------|",
            "| Origin    | /src/sample       |",
            "| Routes    | sample.example.io |",
        ];
        assert_eq!(detail_field(&lines, "Routes").unwrap(), "sample.example.io");
    }

    #[test]
    fn test_detail_field_from_lines() {
        let lines = vec!["Name: sample", "Routes: sample.example.io"];
        assert_eq!(detail_field(&lines, "routes").unwrap(), "sample.example.io");
        assert!(matches!(detail_field(&lines, "Domain"), Err(Error::FieldNotFound(_))));
    }

    #[test]
    fn test_validate_row() {
        let row = ParsedRow::from_pairs([("name", "a"), ("age", "3d")]);
        let warnings = row.validate(&[Column::Name, Column::Status]);
        assert_eq!(
            warnings,
            vec![
                RowWarning::Missing(Column::Status),
                RowWarning::Unexpected(Column::Other("age".into())),
            ]
        );
    }

    #[test]
    fn test_row_serializes_as_map() {
        let row = ParsedRow::from_pairs([("NAME", " a "), ("Status", "1/1")]);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["status"], "1/1");
    }
}
