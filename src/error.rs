//! Error types for the Epinio panel.
//!
//! This module provides structured error handling with semantic exit codes.
//! Backend failures keep the captured command output so it can be shown to
//! the operator alongside the message.

use std::io;
use thiserror::Error;

/// Panel-specific error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend binary could not be located on the path.
    #[error("Epinio CLI not found: {message}")]
    CommandNotFound {
        /// Failure message reported by the OS or shell.
        message: String,
        /// Output captured before the failure, if any.
        output: String,
    },

    /// The backend command ran but reported a failure.
    #[error("Epinio command failed: {message}")]
    CommandExecution {
        /// Failure message (stderr or exit description).
        message: String,
        /// Captured standard output.
        output: String,
    },

    /// An expected field was missing from otherwise-successful output.
    #[error("Field '{0}' not found in Epinio output")]
    FieldNotFound(String),

    /// No active cluster connection is configured.
    #[error("No active cluster connection.")]
    NoActiveConnection,

    /// Configuration error (invalid config file, missing required values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP error from the Epinio API.
    #[error("API error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (file operations, process spawning, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid command-line argument or user input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Command line parsing error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// User cancelled an operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// General/unspecified error.
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type alias for panel operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the exit code for this error type.
    ///
    /// - 0: Success
    /// - 1: General error / backend command failure
    /// - 2: Invalid arguments or configuration
    /// - 3: No active connection
    /// - 10: Network or IO error
    /// - 65: Unexpected backend output format
    /// - 127: Backend binary not found
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidArgument(_) | Error::Parse(_) => 2,

            Error::NoActiveConnection => 3,

            Error::CommandNotFound { .. } => 127,
            Error::CommandExecution { .. } => 1,
            Error::FieldNotFound(_) => 65,

            Error::Http(_) | Error::Io(_) => 10,

            Error::Json(_) | Error::Yaml(_) => 1,

            Error::Cancelled => 1,

            Error::Other(_) => 1,
        }
    }

    /// Returns the backend output captured with this error, if any.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Error::CommandNotFound { output, .. } | Error::CommandExecution { output, .. } => {
                Some(output.as_str()).filter(|o| !o.trim().is_empty())
            },
            _ => None,
        }
    }

    /// Returns a hint to show the operator after the error, if relevant.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::NoActiveConnection => {
                Some("Run 'epinio-panel connections add <config-file>' to add a cluster connection.")
            },
            Error::CommandNotFound { .. } => {
                Some("Install the epinio CLI and make sure it is on your PATH.")
            },
            _ => None,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a general error.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
