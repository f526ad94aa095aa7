//! Interactive REPL for AG-UI backends

mod commands;
mod core;
mod input;
mod render;
mod spinner;

use crate::error::CliError;
use agui_chat_core::{ChatSession, SendOutcome};
use commands::{handle_special_command, SpecialCommandResult};
use core::{input_prompt, print_input_padding, print_welcome, reset_input_style};
use input::InputStyleHelper;
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Cmd, CompletionType, Editor, KeyEvent};
use std::path::PathBuf;

pub use commands::help;
pub use core::SAMPLE_QUESTIONS;
pub use render::{format_attachments, render_line, TerminalRenderer};
pub use spinner::Spinner;

/// Warning printed for blank input
const EMPTY_INPUT_WARNING: &str = "⚠️  Request cannot be empty.";

/// Where input history is kept between runs
pub fn history_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("agui-chat/history.txt"))
        .unwrap_or_else(|| ".agui-chat/history.txt".into())
}

/// Run an interactive chat REPL against the session's backend
///
/// This provides a command-line interface with:
/// - Up/down arrow history, persisted under the user cache dir
/// - Ctrl+R reverse search and Ctrl+J multi-line input
/// - Special commands (`:q`, `/help`, `/<n>` sample questions, etc)
/// - Live rendering of streamed replies, tool activity and attachments
///
/// # Errors
///
/// Returns `CliError` which can be:
/// - `Readline` - Input/readline errors
/// - `Io` - Filesystem errors (history saving)
///
/// Failed chat requests are reported inline and do not end the loop.
///
/// # Example
/// ```no_run
/// use agui_chat_core::{AguiClient, ChatSession};
/// use agui_chat_cli::run_cli;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let session = ChatSession::new(AguiClient::new("http://127.0.0.1:8888")?);
/// run_cli(session).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_cli(mut session: ChatSession) -> Result<(), CliError> {
    print_welcome(&session);

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl: Editor<InputStyleHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(InputStyleHelper));

    // Bind Ctrl-J to insert newline instead of submitting
    rl.bind_sequence(KeyEvent::ctrl('J'), Cmd::Newline);

    let history_path = history_path();
    if history_path.exists() {
        rl.load_history(&history_path).ok();
    }

    let mut prefill: Option<String> = None;

    loop {
        print_input_padding();
        let readline = match prefill.take() {
            Some(text) => rl.readline_with_initial(input_prompt(), (text.as_str(), "")),
            None => rl.readline(input_prompt()),
        };
        reset_input_style();

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    eprintln!("{}", EMPTY_INPUT_WARNING);
                    continue;
                }

                rl.add_history_entry(line)?;

                if let Some(result) = handle_special_command(line, &mut session) {
                    match result {
                        SpecialCommandResult::Exit => break,
                        SpecialCommandResult::Continue => continue,
                        SpecialCommandResult::Prefill(text) => {
                            prefill = Some(text);
                            continue;
                        }
                    }
                }

                println!();
                let mut renderer = TerminalRenderer::stdout(session.client().backend_url());
                match session.send(line, &mut renderer).await {
                    SendOutcome::Failed(e) => log::warn!("request failed: {}", e),
                    SendOutcome::Rejected => eprintln!("{}", EMPTY_INPUT_WARNING),
                    SendOutcome::Completed { deltas } => {
                        log::debug!("turn done after {} deltas", deltas)
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C - discard the line
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    rl.save_history(&history_path)?;

    println!("\n👋 Goodbye!\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_lives_under_agui_chat_dir() {
        let path = history_path();
        assert!(path.ends_with("agui-chat/history.txt"));
    }

    #[test]
    fn empty_input_warning_text() {
        assert!(EMPTY_INPUT_WARNING.contains("Request cannot be empty"));
    }
}
