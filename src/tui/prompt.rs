//! Validated operator prompts.

use std::io;

use dialoguer::Input;

use crate::error::Result;
use crate::executor::input::{InputRequest, Prompter, Validator};

/// Prompter that asks on the terminal and asks again until the answer
/// validates. An interrupted prompt cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinePrompter;

impl LinePrompter {
    /// Prompt on stderr, read from the terminal.
    pub fn stdio() -> Self {
        Self
    }
}

/// Adapt a [`Validator`] to the shape `dialoguer` expects.
fn check(validate: Validator<'_>, input: &str) -> std::result::Result<(), String> {
    validate(input.trim()).map_or(Ok(()), Err)
}

impl Prompter for LinePrompter {
    fn ask(&self, request: &InputRequest<'_>, validate: Validator<'_>) -> Result<Option<String>> {
        let mut input = Input::<String>::new().with_prompt(request.prompt);
        if let Some(default) = request.default {
            input = input.default(default.to_string());
        }

        let answer = input.validate_with(|answer: &String| check(validate, answer)).interact_text();

        match answer {
            Ok(answer) => Ok(Some(answer.trim().to_string())),
            Err(dialoguer::Error::IO(e))
                if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof) =>
            {
                Ok(None)
            },
            Err(dialoguer::Error::IO(e)) => Err(e.into()),
        }
    }
}
