//! Streaming client for AG-UI agent backends
//!
//! This crate provides the pieces a chat front end needs to talk to an
//! AG-UI backend:
//! - [`ingest`]: byte chunks to `data:` payloads to typed [`StreamEvent`]s
//! - [`transcript`]: the conversation and the per-request accumulator
//! - [`rich`]: rich-content markers and inline formatting in assistant text
//! - [`AguiClient`] and [`ChatSession`]: the HTTP request and the turn flow
//!
//! # Quick Start
//!
//! ```no_run
//! use agui_chat_core::{AguiClient, ChatSession, ClientConfig, NoopObserver, RenderModel};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AguiClient::from_config(ClientConfig::from_env())?;
//! let mut session = ChatSession::new(client);
//!
//! session.send("What is 6 * 7?", &mut NoopObserver).await;
//!
//! if let Some(reply) = session.transcript().last() {
//!     let model = RenderModel::parse(&reply.content);
//!     println!("{}", model.plain_text);
//!     if let Some(result) = &model.calc_result {
//!         println!("= {}", result);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming Events Directly
//!
//! ```no_run
//! use agui_chat_core::{AguiClient, StreamEvent, Transcript};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AguiClient::new("http://127.0.0.1:8888")?;
//! let mut transcript = Transcript::new();
//! transcript.push_user("Search the web for AG-UI");
//!
//! let mut events = client.run(&transcript.history()).await?;
//! while let Some(event) = events.next().await {
//!     if let StreamEvent::TextMessageContent { delta, .. } = event? {
//!         print!("{}", delta);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Domain modules
mod client;
pub mod config;
mod error;
pub mod events;
pub mod ingest;
pub mod rich;
pub mod session;
pub mod transcript;

// Client types
pub use client::{AguiClient, AguiClientBuilder, EventStream};
pub use config::{ClientConfig, RuntimeConfig, DEFAULT_BACKEND_URL};

// Error types
pub use error::{ChatError, ChatResult};

// Events and ingestion
pub use events::{MessageRole, StreamEvent};
pub use ingest::DecodeErrorPolicy;

// Conversation state
pub use session::{
    ChatSession, NoopObserver, SendOutcome, TurnObserver, TurnUpdate, CONNECTION_ERROR_MESSAGE,
    GREETING,
};
pub use transcript::{Applied, HistoryMessage, Message, Role, Transcript, TurnState};

// Rich content
pub use rich::{format_inline, image_url, InlineSpan, MarkerKind, RenderModel, Segment};
