//! Epinio Panel
//!
//! Command-line control panel for Epinio clusters.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match epinio_panel::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Don't print if it's an empty error (e.g., from clap usage errors)
            let msg = e.to_string();
            if !msg.is_empty() {
                eprintln!("Error: {}", e);

                if let Some(output) = e.captured_output() {
                    eprintln!();
                    eprintln!("{}", output.trim_end());
                }

                if let Some(hint) = e.hint() {
                    eprintln!();
                    eprintln!("{}", hint);
                }
            }

            let code = e.exit_code();
            ExitCode::from(code as u8)
        },
    }
}
