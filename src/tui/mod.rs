//! Terminal UI helpers.
//!
//! Spinners for long-running backend calls, confirmations for destructive
//! operations, and a validated prompter for operator input.

mod confirm;
mod prompt;
mod spinner;

pub use confirm::{confirm, confirm_danger};
pub use prompt::LinePrompter;
pub use spinner::{Spinner, spin, spin_result};
pub use teapot::output::{is_ci, is_tty};

use crate::client::Context;

/// Whether stderr animations and prompts make sense.
pub(crate) fn is_terminal() -> bool {
    is_tty() && !is_ci()
}

/// Check if we should use interactive TUI features.
///
/// Returns false if:
/// - Running in CI
/// - Output is not a TTY
/// - Quiet mode is enabled
pub fn is_interactive(ctx: &Context) -> bool {
    !ctx.output.is_quiet() && is_terminal()
}
