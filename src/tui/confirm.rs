//! Confirmation prompts.
//!
//! # Example
//!
//! ```rust,ignore
//! use epinio_panel::tui;
//!
//! if tui::confirm_danger("Delete namespace 'workspace'?")? {
//!     executor.delete_namespace("workspace").await?;
//! }
//! ```

use std::io::{self, BufRead, Write};

use teapot::Model;
use teapot::components::Confirm;
use teapot::style::{Color, RESET};

use crate::error::Result;

/// Ask a yes/no question. Empty input means no.
///
/// In non-interactive mode the answer is no.
pub fn confirm(message: &str) -> Result<bool> {
    if !super::is_terminal() {
        teapot::output::info(&format!("{} [N] (non-interactive, using default)", message));
        return Ok(false);
    }

    let prompt = Confirm::new(message).default(false);
    ask(&prompt.view())
}

/// Ask before a destructive operation. Only an explicit yes confirms.
pub fn confirm_danger(message: &str) -> Result<bool> {
    if !super::is_terminal() {
        teapot::output::info(&format!("{} [N] (non-interactive, using default)", message));
        return Ok(false);
    }

    let prompt = Confirm::new(message)
        .default(false)
        .yes_label("Yes, delete")
        .no_label("Cancel")
        .selected_color(Color::Red);
    ask(&format!("{}⚠{} {}", Color::Red.to_ansi_fg(), RESET, prompt.view()))
}

fn ask(view: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} ", view)?;
    stderr.flush()?;
    read_answer(&mut io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_answer() {
        assert!(read_answer(&mut "y\n".as_bytes()).unwrap());
        assert!(read_answer(&mut "YES\n".as_bytes()).unwrap());
        assert!(!read_answer(&mut "\n".as_bytes()).unwrap());
        assert!(!read_answer(&mut "maybe\n".as_bytes()).unwrap());
        assert!(!read_answer(&mut "".as_bytes()).unwrap());
    }

    #[test]
    fn test_non_interactive_declines() {
        // Only meaningful without a terminal.
        if !super::super::is_terminal() {
            assert!(!confirm("Remove connection?").unwrap());
            assert!(!confirm_danger("Delete namespace?").unwrap());
        }
    }
}
