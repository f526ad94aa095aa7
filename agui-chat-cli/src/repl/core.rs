//! Core REPL utilities

use agui_chat_core::{ChatSession, Role};
use std::io::Write;

/// ANSI escape code to reset terminal styling
pub const RESET_STYLE: &str = "\x1b[0m";

/// Questions offered while the conversation is still empty
pub const SAMPLE_QUESTIONS: [&str; 8] = [
    "🌤️ Research weather in Paris and London, then create a comparison chart",
    "📊 Find the top 3 AI trends and visualize their adoption rates",
    "🎨 Create a beautiful 3D surface plot of z = sin(√(x² + y²))",
    "🌍 What's the weather in Tokyo and show me a temperature visualization",
    "🔬 Plot the Mandelbrot set fractal with color gradient",
    "📈 Search for recent breakthroughs in quantum computing and show timeline",
    "🧮 Calculate (45 * 89) + (123 / 4) - 56 and explain the steps",
    "📉 Analyze this sales data and create insights: Q1=120, Q2=150, Q3=95, Q4=200",
];

/// The input prompt string
pub fn input_prompt() -> &'static str {
    "  ❯ "
}

/// Format the welcome banner header
pub fn format_welcome_header() -> String {
    format!("🤖 AG-UI Assistant v{}", env!("CARGO_PKG_VERSION"))
}

/// Format the backend line of the banner
pub fn format_backend_info(backend_url: &str) -> String {
    format!("🔌 Backend: {}", backend_url)
}

/// Format the numbered sample question list
pub fn format_samples() -> String {
    let mut output = String::from("Try asking:\n");
    for (idx, question) in SAMPLE_QUESTIONS.iter().enumerate() {
        output.push_str(&format!("  /{}  {}\n", idx + 1, question));
    }
    output
}

/// Look up sample question `n` (1-based)
pub fn sample_question(n: usize) -> Option<&'static str> {
    n.checked_sub(1).and_then(|idx| SAMPLE_QUESTIONS.get(idx).copied())
}

/// True while the transcript holds nothing but the greeting
pub fn is_fresh(session: &ChatSession) -> bool {
    let messages = session.transcript().messages();
    messages.len() <= 1 && messages.iter().all(|m| m.role == Role::Assistant)
}

/// Flush stdout before reading input
pub fn print_input_padding() {
    if let Err(e) = std::io::stdout().flush() {
        log::debug!("stdout flush failed: {}", e);
    }
}

/// Reset terminal styling after input
pub fn reset_input_style() {
    let mut stdout = std::io::stdout();
    if let Err(e) = write!(stdout, "{}", RESET_STYLE).and_then(|()| stdout.flush()) {
        log::debug!("resetting input style failed: {}", e);
    }
}

/// Format the tip line shown at startup
pub fn format_tip() -> &'static str {
    "Type /help for commands, /1../8 to pick a sample, :q or quit to exit"
}

/// Print welcome banner, greeting and sample questions
pub fn print_welcome(session: &ChatSession) {
    println!("\n{}", format_welcome_header());
    println!("{}", format_backend_info(session.client().backend_url()));
    println!("{}", format_tip());
    println!();

    if let Some(greeting) = session.transcript().messages().first() {
        println!("{}\n", greeting.content);
    }
    if is_fresh(session) {
        println!("{}", format_samples());
    }
}
