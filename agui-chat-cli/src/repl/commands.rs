use super::core::{format_samples, sample_question};
use agui_chat_core::{ChatSession, RenderModel, Role};

/// Classify an input line as a special command type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandType<'a> {
    /// `:q` or `quit`
    Quit,
    /// Slash command with name and arguments
    Slash {
        command: &'a str,
        args: Vec<&'a str>,
    },
    /// Regular input to send to the backend
    Regular,
}

impl<'a> CommandType<'a> {
    /// Parse an input line into a command type
    pub fn parse(input: &'a str) -> Self {
        if input.eq_ignore_ascii_case(":q") || input.eq_ignore_ascii_case("quit") {
            return Self::Quit;
        }

        if input.starts_with('/') {
            let parts: Vec<&str> = input.split_whitespace().collect();
            if !parts.is_empty() {
                return Self::Slash {
                    command: parts[0],
                    args: parts[1..].to_vec(),
                };
            }
        }

        Self::Regular
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommandResult {
    Exit,
    Continue,
    /// Put this text in the next prompt for the user to edit or submit
    Prefill(String),
}

/// Handle special commands (`:q`, `quit` and `/…`)
///
/// Returns Some(result) if this was a special command,
/// None if it should be sent to the backend.
pub fn handle_special_command(
    input: &str,
    session: &mut ChatSession,
) -> Option<SpecialCommandResult> {
    match CommandType::parse(input) {
        CommandType::Quit => Some(SpecialCommandResult::Exit),
        CommandType::Slash { command, args } => Some(match command {
            "/exit" | "/quit" => SpecialCommandResult::Exit,
            "/help" => {
                print!("{}", help::full_text());
                SpecialCommandResult::Continue
            }
            "/history" => {
                let limit: usize = args.first().and_then(|s| s.parse().ok()).unwrap_or(10);
                print!("{}", format_history(session, limit));
                SpecialCommandResult::Continue
            }
            "/clear" => {
                session.reset();
                println!("Conversation cleared.");
                SpecialCommandResult::Continue
            }
            "/samples" => {
                println!("\n{}", format_samples());
                SpecialCommandResult::Continue
            }
            other => match pick_sample(other) {
                Some(question) => SpecialCommandResult::Prefill(question.to_string()),
                None => {
                    eprintln!(
                        "Unknown command: {}. Type /help for available commands.",
                        other
                    );
                    SpecialCommandResult::Continue
                }
            },
        }),
        CommandType::Regular => None,
    }
}

/// `/<n>` selects sample question n
fn pick_sample(command: &str) -> Option<&'static str> {
    command
        .strip_prefix('/')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(sample_question)
}

/// Format the last `limit` transcript messages, markers stripped
pub fn format_history(session: &ChatSession, limit: usize) -> String {
    let messages = session.transcript().messages();
    if messages.is_empty() {
        return "\nNo conversation history yet.\n\n".to_string();
    }

    let skip = messages.len().saturating_sub(limit);
    let mut output = format!("\n📜 Conversation History (last {}):\n\n", limit);
    for (idx, msg) in messages.iter().enumerate().skip(skip) {
        let who = match (msg.role, msg.agent_name.as_deref()) {
            (Role::User, _) => "User",
            (Role::Assistant, Some(name)) => name,
            (Role::Assistant, None) => "Assistant",
        };
        let text = RenderModel::parse(&msg.content).plain_text;
        output.push_str(&format!("{}. {}: {}\n", idx + 1, who, truncate(&text, 100)));
    }
    output.push('\n');
    output
}

/// Shorten to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Help text sections for the CLI
pub mod help {
    /// Header for the help display
    pub const HEADER: &str = "\n📖 Available Commands:\n";

    /// Conversation commands section
    pub const CONVERSATION: &str = "\
Conversation:
  /help             Show this help message
  /history [n]      Show last n messages (default: 10)
  /clear            Start over, keeping the greeting
  /samples          List sample questions
  /<n>              Put sample question n in the prompt
";

    /// Exit commands section
    pub const EXIT: &str = "\
Exit:
  :q, quit          Exit
  /exit, /quit      Exit
  Ctrl+D            Exit
";

    /// Keyboard shortcuts section
    pub const KEYBOARD: &str = "\
Keyboard Shortcuts:
  Up/Down           Navigate input history
  Ctrl+R            Reverse search history
  Ctrl+J            Insert a newline
  Ctrl+C            Discard the current line (doesn't exit)
";

    /// Get the complete help text
    pub fn full_text() -> String {
        format!("{}{}\n{}\n{}\n", HEADER, CONVERSATION, EXIT, KEYBOARD)
    }
}
