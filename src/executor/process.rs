//! External process execution.
//!
//! Runs fully formed [`CommandLine`]s in a configured working directory with
//! an environment overlay merged over the ambient environment, and classifies
//! failures into [`Error::CommandNotFound`] and [`Error::CommandExecution`].

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use async_trait::async_trait;
use tracing::debug;

use super::command::CommandLine;
use crate::error::{Error, Result};

/// Exit code shells use for "command not found".
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Executes command lines on behalf of the resource executor.
///
/// [`CommandExecutor`] is the process-backed implementation; tests substitute
/// a recording fake.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion without blocking the runtime.
    async fn run(&self, command: &CommandLine) -> Result<String>;
}

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// The command that ran.
    pub command: String,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    fn from_output(command: &CommandLine, output: Output) -> Self {
        Self {
            command: command.to_string(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Classify the exit into the panel's error taxonomy.
    ///
    /// Returns captured stdout on success.
    pub fn into_result(self) -> Result<String> {
        if self.success() {
            return Ok(self.stdout);
        }

        let message = if self.stderr.trim().is_empty() {
            match self.code {
                Some(code) => format!("{} exited with code {}", self.command, code),
                None => format!("{} was terminated by a signal", self.command),
            }
        } else {
            self.stderr.trim().to_string()
        };

        if self.code == Some(EXIT_COMMAND_NOT_FOUND) || is_not_found_message(&message) {
            Err(Error::CommandNotFound { message, output: self.stdout })
        } else {
            Err(Error::CommandExecution { message, output: self.stdout })
        }
    }
}

fn is_not_found_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("is not recognized") || lower.contains("command not found")
}

fn spawn_error(command: &CommandLine, err: io::Error) -> Error {
    let message = format!("Failed to run {}: {}", command.program(), err);
    if err.kind() == io::ErrorKind::NotFound {
        Error::CommandNotFound { message, output: String::new() }
    } else {
        Error::CommandExecution { message, output: String::new() }
    }
}

/// Listener invoked when a spawned process finishes.
pub type ExitListener = Box<dyn FnOnce(&ProcessOutput) + Send>;

/// Handle to a process started with [`CommandExecutor::execute`].
pub struct ProcessHandle {
    command: CommandLine,
    child: tokio::process::Child,
    listeners: Vec<ExitListener>,
}

impl ProcessHandle {
    /// Attach a listener that runs once the process has exited.
    pub fn on_exit(mut self, listener: impl FnOnce(&ProcessOutput) + Send + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// OS process id, if still available.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the process to finish and notify listeners.
    ///
    /// The exit is not classified here; call [`ProcessOutput::into_result`].
    pub async fn wait(self) -> Result<ProcessOutput> {
        let output = self.child.wait_with_output().await?;
        let output = ProcessOutput::from_output(&self.command, output);
        debug!(command = %output.command, code = ?output.code, "process exited");

        for listener in self.listeners {
            listener(&output);
        }

        Ok(output)
    }
}

/// Process-backed command executor.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    cwd: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl CommandExecutor {
    /// Create an executor that runs in the current directory with the
    /// ambient environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory for spawned processes.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add environment overrides. Overlay keys win over the ambient
    /// environment.
    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env.extend(env.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The environment overlay.
    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    fn std_command(&self, command: &CommandLine) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args()).envs(&self.env);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    /// Run a command and block until it finishes, returning stdout.
    pub fn execute_sync(&self, command: &CommandLine) -> Result<String> {
        debug!(command = %command, "executing");
        let output = self
            .std_command(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(command, e))?;

        ProcessOutput::from_output(command, output).into_result()
    }

    /// Start a command without waiting for it.
    pub fn execute(&self, command: &CommandLine) -> Result<ProcessHandle> {
        debug!(command = %command, "spawning");
        let child = tokio::process::Command::from(self.std_command(command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| spawn_error(command, e))?;

        Ok(ProcessHandle { command: command.clone(), child, listeners: Vec::new() })
    }
}

#[async_trait]
impl CommandRunner for CommandExecutor {
    async fn run(&self, command: &CommandLine) -> Result<String> {
        self.execute(command)?.wait().await?.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn output(code: Option<i32>, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            command: "epinio app list".into(),
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn test_success_returns_stdout() {
        assert_eq!(output(Some(0), "rows", "").into_result().unwrap(), "rows");
    }

    #[test]
    fn test_failure_keeps_message_and_output() {
        let err = output(Some(1), "partial", "namespace not found\n").into_result().unwrap_err();
        match err {
            Error::CommandExecution { message, output } => {
                assert_eq!(message, "namespace not found");
                assert_eq!(output, "partial");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_stderr_describes_exit() {
        let err = output(Some(2), "", "").into_result().unwrap_err();
        assert!(err.to_string().contains("exited with code 2"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(matches!(
            output(Some(127), "", "sh: epinio: not found").into_result(),
            Err(Error::CommandNotFound { .. })
        ));
        assert!(matches!(
            output(Some(1), "", "'epinio' is not recognized as an internal or external command")
                .into_result(),
            Err(Error::CommandNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_binary_is_command_not_found() {
        let executor = CommandExecutor::new();
        let line = CommandLine::new("epinio-panel-definitely-missing-binary", vec!["app".into()]);
        assert!(matches!(executor.execute_sync(&line), Err(Error::CommandNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_env_overlay_and_cwd() {
        let dir = tempfile::TempDir::new().unwrap();
        let executor = CommandExecutor::new()
            .with_cwd(dir.path())
            .with_env([("EPINIO_PANEL_TEST_VAR", "overlay")]);

        let line = CommandLine::new(
            "sh",
            vec!["-c".into(), "printf '%s %s' \"$EPINIO_PANEL_TEST_VAR\" \"$(pwd)\"".into()],
        );
        let out = executor.execute_sync(&line).unwrap();
        assert!(out.starts_with("overlay "));
        let expected = dir.path().canonicalize().unwrap();
        assert!(out.ends_with(&expected.display().to_string()) || out.ends_with(&dir.path().display().to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_notifies_listeners() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let handle = CommandExecutor::new()
            .execute(&CommandLine::new("sh", vec!["-c".into(), "echo done".into()]))
            .unwrap()
            .on_exit(move |out| flag.store(out.success(), Ordering::SeqCst));

        let out = handle.wait().await.unwrap();
        assert_eq!(out.into_result().unwrap().trim(), "done");
        assert!(fired.load(Ordering::SeqCst));
    }
}
