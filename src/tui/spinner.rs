//! Progress spinner for long-running backend calls.
//!
//! The spinner animates on stderr from a background task while the wrapped
//! future runs. Off a terminal it prints the message once instead.
//!
//! ```rust,ignore
//! tui::spin_result("Pushing web...", "Pushed web", app.push(&source)).await?;
//! ```

use std::fmt::Display;
use std::future::Future;
use std::io::{self, Write};

use teapot::Model;
use teapot::components::{Spinner as Frames, SpinnerStyle};
use teapot::style::{CLEAR_LINE, Color};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running spinner. Dropping it stops the animation.
pub struct Spinner {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner showing `message`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        if !super::is_terminal() {
            teapot::output::info(&message);
            return Self { stop: None, task: None };
        }

        let (stop, mut stopped) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut frames =
                Frames::new().style(SpinnerStyle::Dots).color(Color::Cyan).message(&message);
            let mut ticker = tokio::time::interval(SpinnerStyle::Dots.interval());

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        draw(&frames.view());
                        frames.tick();
                    },
                }
            }
            draw("");
        });

        Self { stop: Some(stop), task: Some(task) }
    }

    /// Stop the animation and wait for the line to be cleared.
    pub async fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Stop and report success.
    pub async fn succeed(self, message: &str) {
        self.finish().await;
        teapot::output::success(message);
    }

    /// Stop and report failure.
    pub async fn fail(self, message: &str) {
        self.finish().await;
        teapot::output::error(message);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            draw("");
        }
    }
}

fn draw(text: &str) {
    let mut stderr = io::stderr().lock();
    let _ = write!(stderr, "\r{}{}", CLEAR_LINE, text);
    let _ = stderr.flush();
}

/// Run `future` under a spinner and return its output.
pub async fn spin<F: Future>(message: impl Into<String>, future: F) -> F::Output {
    let spinner = Spinner::start(message);
    let output = future.await;
    spinner.finish().await;
    output
}

/// Run `future` under a spinner, then report success with `done` or the
/// error message.
pub async fn spin_result<F, T, E>(message: impl Into<String>, done: impl Into<String>, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let spinner = Spinner::start(message);
    let result = future.await;
    match &result {
        Ok(_) => spinner.succeed(&done.into()).await,
        Err(e) => spinner.fail(&e.to_string()).await,
    }
    result
}
