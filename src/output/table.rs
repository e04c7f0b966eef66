//! Plain-text tables.
//!
//! Columns are sized to their widest cell (measured in terminal cells, so
//! wide characters line up) and separated by two spaces. Trailing padding is
//! stripped from every line.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const GAP: &str = "  ";
const ELLIPSIS: &str = "...";

/// A table of string cells.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: Option<usize>,
}

impl Table {
    /// A table with the given column headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Append a row. Short rows leave trailing cells blank.
    pub fn push_row(&mut self, cells: Vec<String>) -> &mut Self {
        self.rows.push(cells);
        self
    }

    /// Cap every column at `width` cells; longer values end in `...`.
    pub fn max_width(&mut self, width: usize) -> &mut Self {
        self.max_width = Some(width);
        self
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(Vec::len).chain([self.headers.len()]).max().unwrap_or(0);
        let cap = self.max_width.unwrap_or(usize::MAX);

        (0..columns)
            .map(|i| {
                std::iter::once(&self.headers)
                    .chain(&self.rows)
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
                    .min(cap)
            })
            .collect()
    }

    /// Render headers, a dashed rule and the rows.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        if !self.headers.is_empty() {
            push_line(&mut out, &self.headers, &widths);
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            push_line(&mut out, &rule, &widths);
        }
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, width)| fit(cells.get(i).map_or("", String::as_str), *width))
        .collect::<Vec<_>>()
        .join(GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Pad or truncate `cell` to exactly `width` terminal cells.
fn fit(cell: &str, width: usize) -> String {
    let cell_width = cell.width();
    if cell_width <= width {
        return format!("{}{}", cell, " ".repeat(width - cell_width));
    }
    if width <= ELLIPSIS.len() {
        return ".".repeat(width);
    }

    let budget = width - ELLIPSIS.len();
    let mut used = 0;
    let mut fitted: String = cell
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    fitted.push_str(ELLIPSIS);

    let fitted_width = fitted.width();
    fitted.push_str(&" ".repeat(width.saturating_sub(fitted_width)));
    fitted
}
