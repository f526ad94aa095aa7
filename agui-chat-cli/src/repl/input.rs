//! Input styling for rustyline REPL

use super::core::SAMPLE_QUESTIONS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper, Result as RustylineResult};
use std::borrow::Cow;

/// Background shade of the input area
const INPUT_BACKGROUND: &str = "\x1b[48;5;236m";

/// Commands offered by tab completion
pub const COMMANDS: [&str; 7] = [
    "/help", "/history", "/clear", "/samples", "/exit", "/quit", ":q",
];

#[derive(Clone, Copy, Debug, Default)]
pub struct InputStyleHelper;

/// Completion candidates for the text before the cursor.
///
/// Only the first word is completed, and only when it starts a command.
/// `/<n>` completes to the sample question itself.
pub fn complete_command(line: &str) -> Vec<Pair> {
    if line.contains(char::is_whitespace) || !(line.starts_with('/') || line.starts_with(':')) {
        return Vec::new();
    }

    if let Some(question) = line
        .strip_prefix('/')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| SAMPLE_QUESTIONS.get(idx))
    {
        return vec![Pair {
            display: question.to_string(),
            replacement: question.to_string(),
        }];
    }

    COMMANDS
        .iter()
        .filter(|cmd| cmd.starts_with(line))
        .map(|cmd| Pair {
            display: cmd.to_string(),
            replacement: cmd.to_string(),
        })
        .collect()
}

impl Completer for InputStyleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> RustylineResult<(usize, Vec<Self::Candidate>)> {
        Ok((0, complete_command(&line[..pos])))
    }
}

impl Hinter for InputStyleHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for InputStyleHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!("{}\x1b[2K{}", INPUT_BACKGROUND, prompt))
    }

    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }

        // Keep the shade on every row of a multi-line entry
        let continued = format!("\x1b[0K\r\n{}\x1b[2K", INPUT_BACKGROUND);
        Cow::Owned(format!(
            "{}{}\x1b[0K",
            INPUT_BACKGROUND,
            line.replace('\n', &continued)
        ))
    }
}

impl Validator for InputStyleHelper {
    fn validate(&self, _ctx: &mut ValidationContext<'_>) -> RustylineResult<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for InputStyleHelper {}
