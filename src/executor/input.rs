//! Operator input for interactive operations.
//!
//! Setting an environment variable and scaling an application need a value
//! from the operator. Input is collected through a [`Prompter`] and checked
//! with the same predicate before any command is built.

use std::fmt;

use crate::error::{Error, Result};

/// A request for one line of operator input.
#[derive(Debug, Clone, Copy)]
pub struct InputRequest<'a> {
    /// Question shown to the operator.
    pub prompt: &'a str,
    /// Value used when the operator just presses enter.
    pub default: Option<&'a str>,
}

/// Returns `None` when the input is acceptable, or the message to show.
pub type Validator<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Source of operator input.
pub trait Prompter {
    /// Ask for a value.
    ///
    /// Returns `Ok(None)` when the operator cancels. Implementations must not
    /// return a value the validator rejects.
    fn ask(&self, request: &InputRequest<'_>, validate: Validator<'_>) -> Result<Option<String>>;
}

/// A prompter that answers with a value fixed up front (for example from a
/// command-line flag). Invalid values are rejected instead of re-prompted.
#[derive(Debug, Clone, Default)]
pub struct PresetInput {
    value: Option<String>,
}

impl PresetInput {
    /// Answer every request with `value`; `None` behaves as a cancel.
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }
}

impl Prompter for PresetInput {
    fn ask(&self, _request: &InputRequest<'_>, validate: Validator<'_>) -> Result<Option<String>> {
        match &self.value {
            Some(value) => match validate(value) {
                Some(message) => Err(Error::invalid_arg(message)),
                None => Ok(Some(value.clone())),
            },
            None => Ok(None),
        }
    }
}

/// A `KEY=VALUE` environment assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    /// Variable name.
    pub key: String,
    /// Variable value. Everything after the first `=`.
    pub value: String,
}

impl EnvAssignment {
    /// Prompt text for environment input.
    pub const PROMPT: &'static str = "Set Env variable. Example: TEST_ENV=my_value";

    /// Parse `KEY=VALUE`. Both sides must be non-empty.
    pub fn parse(input: &str) -> Result<Self> {
        if let Some(message) = Self::validate(input) {
            return Err(Error::invalid_arg(message));
        }

        let (key, value) = input.split_once('=').unwrap_or_default();
        Ok(Self { key: key.trim().to_string(), value: value.to_string() })
    }

    /// Validation predicate used by prompts.
    pub fn validate(input: &str) -> Option<String> {
        match input.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !value.is_empty() => None,
            _ => Some("Doesn't satisfy the format TEST_ENV=my_value".to_string()),
        }
    }
}

impl fmt::Display for EnvAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Prompt text for scale input.
pub const SCALE_PROMPT: &str = "Scale application. Example: 2";

/// Parse an instance count.
pub fn parse_instances(input: &str) -> Result<u32> {
    input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_arg("Not a number! Please enter a valid integer."))
}

/// Validation predicate for instance counts.
pub fn validate_instances(input: &str) -> Option<String> {
    parse_instances(input).err().map(|e| match e {
        Error::InvalidArgument(message) => message,
        other => other.to_string(),
    })
}

/// Ask for an environment assignment.
pub fn request_env(prompter: &dyn Prompter) -> Result<EnvAssignment> {
    let request = InputRequest { prompt: EnvAssignment::PROMPT, default: Some("TEST_ENV=my_value") };
    let answer = prompter.ask(&request, &EnvAssignment::validate)?.ok_or(Error::Cancelled)?;
    EnvAssignment::parse(&answer)
}

/// Ask for an instance count.
pub fn request_instances(prompter: &dyn Prompter) -> Result<u32> {
    let request = InputRequest { prompt: SCALE_PROMPT, default: Some("1") };
    let answer = prompter.ask(&request, &validate_instances)?.ok_or(Error::Cancelled)?;
    parse_instances(&answer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_env_assignment() {
        let env = EnvAssignment::parse("MODE=prod").unwrap();
        assert_eq!(env.key, "MODE");
        assert_eq!(env.value, "prod");

        let nested = EnvAssignment::parse("URL=a=b").unwrap();
        assert_eq!(nested.value, "a=b");

        assert!(EnvAssignment::parse("MODE").is_err());
        assert!(EnvAssignment::parse("=prod").is_err());
        assert!(EnvAssignment::parse("MODE=").is_err());
    }

    #[test]
    fn test_instances() {
        assert_eq!(parse_instances(" 3 ").unwrap(), 3);
        assert!(parse_instances("three").is_err());
        assert!(parse_instances("-1").is_err());
        assert!(validate_instances("2").is_none());
        assert!(validate_instances("x").is_some());
    }

    #[test]
    fn test_preset_input() {
        let ok = PresetInput::new(Some("A=1".into()));
        assert_eq!(request_env(&ok).unwrap().to_string(), "A=1");

        let bad = PresetInput::new(Some("nope".into()));
        assert!(matches!(request_env(&bad), Err(Error::InvalidArgument(_))));

        let cancelled = PresetInput::new(None);
        assert!(matches!(request_instances(&cancelled), Err(Error::Cancelled)));

        let scale = PresetInput::new(Some("4".into()));
        assert_eq!(request_instances(&scale).unwrap(), 4);
    }
}
