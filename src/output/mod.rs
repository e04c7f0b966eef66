//! Output formatting for the CLI.
//!
//! Results go to stdout in the selected [`OutputFormat`]; notices (progress,
//! confirmations, empty-list messages) go to stderr so piped output stays
//! machine-readable.

mod table;

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;

use serde::Serialize;
pub use table::Table;

use crate::error::{Error, Result};

/// Widest table column before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 60;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned columns.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
    /// One JSON object per line.
    JsonLines,
}

impl OutputFormat {
    /// Parse an output format name.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "jsonl" | "jsonlines" => Ok(Self::JsonLines),
            _ => Err(Error::invalid_arg(format!(
                "Unknown output format '{}'. Use: table, json, yaml, jsonl",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::JsonLines => "jsonl",
        })
    }
}

/// A value that can be shown as one table row.
pub trait Displayable {
    /// Column headers.
    const HEADERS: &'static [&'static str];

    /// Cells, in header order.
    fn row(&self) -> Vec<String>;
}

/// Render a list of records in `format`.
pub fn render_list<T: Displayable + Serialize>(format: OutputFormat, items: &[T]) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => {
            let mut table = Table::new(T::HEADERS.iter().copied());
            table.max_width(MAX_COLUMN_WIDTH);
            for item in items {
                table.push_row(item.row());
            }
            table.render()
        },
        OutputFormat::JsonLines => {
            let mut out = String::new();
            for item in items {
                out.push_str(&serde_json::to_string(item)?);
                out.push('\n');
            }
            out
        },
        _ => render_value(format, &items)?,
    };
    Ok(rendered)
}

/// Render a single value in `format`. Table mode falls back to JSON.
pub fn render_value<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::JsonLines => Ok(serde_json::to_string(value)? + "\n"),
        OutputFormat::Table | OutputFormat::Json => Ok(serde_json::to_string_pretty(value)? + "\n"),
    }
}

#[derive(Debug, Clone, Copy)]
enum Notice {
    Info,
    Success,
}

/// Output writer that handles format selection and terminal capabilities.
#[derive(Debug)]
pub struct Output {
    format: OutputFormat,
    color: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output writer.
    pub fn new(format: OutputFormat, color: bool, quiet: bool) -> Self {
        Self { format, color, quiet }
    }

    /// Create an output writer from CLI options.
    pub fn from_cli(format: &str, color: &str, quiet: bool) -> Result<Self> {
        let format = format.parse()?;
        let color = match color {
            "always" => true,
            "never" => false,
            _ => io::stdout().is_terminal(),
        };
        Ok(Self::new(format, color, quiet))
    }

    /// Print a list of records.
    pub fn list<T: Displayable + Serialize>(&self, items: &[T]) -> Result<()> {
        self.text(&render_list(self.format, items)?);
        Ok(())
    }

    /// Print one record.
    pub fn record<T: Displayable + Serialize>(&self, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table | OutputFormat::JsonLines => self.list(std::slice::from_ref(item)),
            _ => self.value(item),
        }
    }

    /// Print a serializable value.
    pub fn value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.text(&render_value(self.format, value)?);
        Ok(())
    }

    /// Print text to stdout as is.
    pub fn text(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    /// Print a line to stdout.
    pub fn line(&self, text: &str) {
        println!("{}", text);
    }

    /// Print an informational notice to stderr.
    pub fn info(&self, message: &str) {
        self.notice(Notice::Info, message);
    }

    /// Print a success notice to stderr.
    pub fn success(&self, message: &str) {
        self.notice(Notice::Success, message);
    }

    fn notice(&self, kind: Notice, message: &str) {
        if self.quiet {
            return;
        }
        match (kind, self.color) {
            (Notice::Info, _) => eprintln!("{}", message),
            (Notice::Success, true) => eprintln!("\x1b[32m✓\x1b[0m {}", message),
            (Notice::Success, false) => eprintln!("✓ {}", message),
        }
    }

    /// Check if output is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if color is enabled.
    pub fn has_color(&self) -> bool {
        self.color
    }

    /// Get the current output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(OutputFormat::Table, true, false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        replicas: u32,
    }

    impl Displayable for Row {
        const HEADERS: &'static [&'static str] = &["NAME", "REPLICAS"];

        fn row(&self) -> Vec<String> {
            vec![self.name.to_string(), self.replicas.to_string()]
        }
    }

    const ROWS: &[Row] = &[Row { name: "web", replicas: 2 }, Row { name: "worker", replicas: 1 }];

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("yaml").unwrap(), OutputFormat::Yaml);
        assert_eq!(OutputFormat::parse("jsonl").unwrap(), OutputFormat::JsonLines);
        assert!(OutputFormat::parse("invalid").is_err());
        assert_eq!(OutputFormat::JsonLines.to_string(), "jsonl");
    }

    #[test]
    fn test_from_cli_color_modes() {
        let output = Output::from_cli("yaml", "never", true).unwrap();
        assert_eq!(output.format(), OutputFormat::Yaml);
        assert!(!output.has_color());
        assert!(output.is_quiet());

        assert!(Output::from_cli("table", "always", false).unwrap().has_color());
        assert!(Output::from_cli("xml", "auto", false).is_err());
    }

    #[test]
    fn test_render_list_table() {
        let rendered = render_list(OutputFormat::Table, ROWS).unwrap();
        assert_eq!(rendered, "NAME    REPLICAS\n------  --------\nweb     2\nworker  1\n");
    }

    #[test]
    fn test_render_list_jsonl() {
        let rendered = render_list(OutputFormat::JsonLines, ROWS).unwrap();
        assert_eq!(
            rendered,
            "{\"name\":\"web\",\"replicas\":2}\n{\"name\":\"worker\",\"replicas\":1}\n"
        );
    }

    #[test]
    fn test_render_list_json_is_array() {
        let rendered = render_list(OutputFormat::Json, ROWS).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[1]["name"], "worker");
    }

    #[test]
    fn test_render_value_yaml() {
        let rendered = render_value(OutputFormat::Yaml, &ROWS[0]).unwrap();
        assert_eq!(rendered, "name: web\nreplicas: 2\n");
    }
}
