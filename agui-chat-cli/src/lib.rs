//! Terminal chat front end for AG-UI agent backends
//!
//! This crate provides:
//! - Backend selection (flag, runtime config endpoint, environment)
//! - An interactive REPL driving an [`agui_chat_core::ChatSession`]
//! - Live, line-by-line rendering of streamed assistant text
//! - Tool activity display and rich-content attachments

mod error;
pub mod repl;
mod setup;

pub use error::CliError;
pub use repl::{format_attachments, render_line, run_cli, TerminalRenderer};
pub use setup::{connect, BackendSource};
