//! Terminal rendering of a streaming turn
//!
//! Assistant text is printed one complete line at a time. Markers and inline
//! formatting never span a line, so each line can be stripped and styled on
//! its own; the side-channel values are collected from the whole message and
//! printed once the turn is over.

use super::commands::truncate;
use super::spinner::Spinner;
use agui_chat_core::{
    format_inline, image_url, InlineSpan, Message, RenderModel, SendOutcome, StreamEvent,
    TurnObserver, CONNECTION_ERROR_MESSAGE,
};
use crossterm::style::Stylize;
use std::collections::HashMap;
use std::io::{Stdout, Write};

/// Longest tool result shown, in characters
const MAX_RESULT_CHARS: usize = 200;

/// Style one span; with `color` off the text is returned as-is.
fn style_span(span: &InlineSpan, color: bool) -> String {
    let text = span.text.as_str();
    if !color {
        return text.to_string();
    }
    match (span.strong, span.code) {
        (true, true) => text.bold().cyan().to_string(),
        (true, false) => text.bold().to_string(),
        (false, true) => text.cyan().to_string(),
        (false, false) => text.to_string(),
    }
}

/// Render one line of assistant text: markers removed, inline styles applied.
pub fn render_line(line: &str, color: bool) -> String {
    let plain = RenderModel::parse(line).plain_text;
    format_inline(&plain)
        .iter()
        .map(|span| style_span(span, color))
        .collect()
}

/// Lines listing the side-channel values of a message. Empty values are
/// skipped.
pub fn format_attachments(model: &RenderModel, backend_url: &str) -> String {
    let mut output = String::new();

    if let Some(url) = model.weather_icon_url.as_deref().filter(|u| !u.is_empty()) {
        output.push_str(&format!("  🌤️  {}\n", url));
    }
    if let Some(result) = model.calc_result.as_deref().filter(|r| !r.is_empty()) {
        output.push_str(&format!("  = {}\n", result));
    }
    for id in model.image_ids.iter().filter(|id| !id.is_empty()) {
        output.push_str(&format!("  🖼️  {}\n", image_url(backend_url, id)));
    }
    for link in model.links.iter().filter(|l| !l.is_empty()) {
        output.push_str(&format!("  🔗 {}\n", link));
    }

    output
}

#[derive(Debug, Default)]
struct ToolCall {
    name: String,
    args: String,
}

/// [`TurnObserver`] that prints a turn to a terminal (or any writer).
pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    backend_url: String,
    color: bool,
    spinner: Option<Spinner>,
    header_shown: bool,
    pending: String,
    text: String,
    tools: HashMap<String, ToolCall>,
}

impl TerminalRenderer<Stdout> {
    /// Colored renderer on stdout with a "Thinking..." spinner running until
    /// the response arrives.
    pub fn stdout(backend_url: impl Into<String>) -> Self {
        let mut renderer = Self::new(std::io::stdout(), backend_url, true);
        renderer.spinner = Some(Spinner::new("Thinking..."));
        renderer
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, backend_url: impl Into<String>, color: bool) -> Self {
        Self {
            out,
            backend_url: backend_url.into(),
            color,
            spinner: None,
            header_shown: false,
            pending: String::new(),
            text: String::new(),
            tools: HashMap::new(),
        }
    }

    /// Consume the renderer, returning the writer
    pub fn into_inner(mut self) -> W {
        self.stop_spinner();
        let Self { out, .. } = self;
        out
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            log::debug!("terminal write failed: {}", e);
        }
    }

    fn paint(&self, text: &str, paint: fn(&str) -> String) -> String {
        if self.color {
            paint(text)
        } else {
            text.to_string()
        }
    }

    fn emit_line(&mut self, line: &str) {
        let rendered = render_line(line, self.color);
        self.emit(&format!("{}\n", rendered));
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
    }

    fn print_tool_event(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::ToolCallStart {
                tool_call_id,
                tool_call_name,
                ..
            } => {
                self.tools.insert(
                    tool_call_id.clone(),
                    ToolCall {
                        name: tool_call_name.clone(),
                        args: String::new(),
                    },
                );
                let line = self.paint(&format!("🔧 Calling tool: {}", tool_call_name), |t| {
                    t.magenta().to_string()
                });
                self.emit(&format!("\n  {}\n", line));
            }
            StreamEvent::ToolCallArgs {
                tool_call_id,
                delta,
            } => {
                if let Some(call) = self.tools.get_mut(tool_call_id) {
                    call.args.push_str(delta);
                }
            }
            StreamEvent::ToolCallEnd { tool_call_id } => {
                let args = self
                    .tools
                    .get(tool_call_id)
                    .map(|call| call.args.clone())
                    .unwrap_or_default();
                if !args.is_empty() {
                    let line =
                        self.paint(&format!("📋 Arguments: {}", args), |t| t.magenta().to_string());
                    self.emit(&format!("  {}\n", line));
                }
            }
            StreamEvent::ToolCallResult {
                tool_call_id,
                content,
                ..
            } => {
                let name = self
                    .tools
                    .remove(tool_call_id)
                    .map(|call| call.name)
                    .unwrap_or_else(|| tool_call_id.clone());
                log::debug!("tool {} returned {} bytes", name, content.len());
                let line = self.paint(
                    &format!("✅ Result: {}", truncate(content, MAX_RESULT_CHARS)),
                    |t| t.green().to_string(),
                );
                self.emit(&format!("  {}\n", line));
            }
            StreamEvent::RunError { message, code } => {
                let text = match code {
                    Some(code) => format!("❌ Error [{}]: {}", code, message),
                    None => format!("❌ Error: {}", message),
                };
                let line = self.paint(&text, |t| t.red().to_string());
                self.emit(&format!("  {}\n", line));
            }
            _ => {}
        }
    }
}

impl<W: Write> TurnObserver for TerminalRenderer<W> {
    fn on_started(&mut self) {
        self.stop_spinner();
    }

    fn on_event(&mut self, event: &StreamEvent) {
        self.print_tool_event(event);
    }

    fn on_delta(&mut self, delta: &str, message: &Message) {
        if !self.header_shown {
            self.header_shown = true;
            let name = message.agent_name.as_deref().unwrap_or("Assistant");
            let header = self.paint(&format!("🤖 {}", name), |t| t.green().bold().to_string());
            self.emit(&format!("\n{}\n", header));
        }

        self.text.push_str(delta);
        self.pending.push_str(delta);
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            self.emit_line(line.trim_end_matches('\n'));
        }
    }

    fn on_finished(&mut self, outcome: &SendOutcome) {
        self.stop_spinner();
        self.flush_pending();

        match outcome {
            SendOutcome::Completed { .. } => {
                let model = RenderModel::parse(&self.text);
                let attachments = format_attachments(&model, &self.backend_url);
                if !attachments.is_empty() {
                    self.emit(&format!("\n{}", attachments));
                }
            }
            SendOutcome::Failed(e) => {
                log::debug!("turn failed: {}", e);
                let line = self.paint(CONNECTION_ERROR_MESSAGE, |t| t.red().to_string());
                self.emit(&format!("\n{}\n", line));
            }
            SendOutcome::Rejected => {}
        }
        self.emit("\n");
    }
}
