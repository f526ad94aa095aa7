//! A chat session: transcript plus one request at a time.
//!
//! [`ChatSession::send`] runs a full turn: the user message is appended, the
//! backend is asked to run with the whole history, and once the response
//! arrives an empty assistant placeholder is appended and filled from the
//! event stream. Any request or stream failure ends the turn with a single
//! assistant message, [`CONNECTION_ERROR_MESSAGE`].
//!
//! Progress is reported through a [`TurnObserver`]. Closures taking a
//! [`TurnUpdate`] work as observers:
//!
//! ```no_run
//! use agui_chat_core::{AguiClient, ChatSession, TurnUpdate};
//!
//! # async fn example() -> agui_chat_core::ChatResult<()> {
//! let mut session = ChatSession::new(AguiClient::new("http://127.0.0.1:8888")?);
//! session
//!     .send_with("What's the weather in Paris?", |update| {
//!         if let TurnUpdate::Delta { delta, .. } = update {
//!             print!("{}", delta);
//!         }
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

use crate::client::AguiClient;
use crate::error::{ChatError, ChatResult};
use crate::events::StreamEvent;
use crate::transcript::{Applied, Message, Transcript, TurnState, INITIAL_AGENT_NAME};
use futures::StreamExt;

/// Assistant message that opens a new session.
pub const GREETING: &str = "Hi! 👋 I'm your AG-UI assistant with code interpreter capabilities. \
I can help you with weather, web search, calculations, data analytics, and visualizations. \
What would you like to explore?";

/// Assistant message appended when a request or its stream fails.
pub const CONNECTION_ERROR_MESSAGE: &str = "Sorry, there was an error connecting to the server.";

/// How a call to [`ChatSession::send`] ended.
#[derive(Debug)]
pub enum SendOutcome {
    /// Input was empty or a request was already in flight; nothing changed.
    Rejected,
    /// The stream ended normally after `deltas` content deltas.
    Completed { deltas: usize },
    /// The request or stream failed; the error message has been appended.
    Failed(ChatError),
}

impl SendOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SendOutcome::Completed { .. })
    }
}

/// Progress of a single turn, as seen by closure observers.
#[derive(Debug)]
pub enum TurnUpdate<'a> {
    /// The response arrived and the placeholder was appended.
    Started,
    /// An event was received (before it is applied).
    Event(&'a StreamEvent),
    /// A delta was appended to `message`.
    Delta { delta: &'a str, message: &'a Message },
    /// The turn is over; the transcript is final.
    Finished(&'a SendOutcome),
}

/// Receives progress notifications while a turn runs.
///
/// Every callback defaults to doing nothing.
pub trait TurnObserver {
    fn on_started(&mut self) {}

    fn on_event(&mut self, _event: &StreamEvent) {}

    fn on_delta(&mut self, _delta: &str, _message: &Message) {}

    fn on_finished(&mut self, _outcome: &SendOutcome) {}
}

/// Blanket implementation for closures
impl<F> TurnObserver for F
where
    F: FnMut(&TurnUpdate<'_>),
{
    fn on_started(&mut self) {
        self(&TurnUpdate::Started)
    }

    fn on_event(&mut self, event: &StreamEvent) {
        self(&TurnUpdate::Event(event))
    }

    fn on_delta(&mut self, delta: &str, message: &Message) {
        self(&TurnUpdate::Delta { delta, message })
    }

    fn on_finished(&mut self, outcome: &SendOutcome) {
        self(&TurnUpdate::Finished(outcome))
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TurnObserver for NoopObserver {}

/// Clears the loading flag however the turn ends, including when the send
/// future is dropped mid-stream.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Conversation with one backend.
#[derive(Debug)]
pub struct ChatSession {
    client: AguiClient,
    transcript: Transcript,
    loading: bool,
}

impl ChatSession {
    /// Start a session whose transcript holds the [`GREETING`].
    pub fn new(client: AguiClient) -> Self {
        Self::with_transcript(client, Transcript::with_greeting(GREETING))
    }

    pub fn with_transcript(client: AguiClient, transcript: Transcript) -> Self {
        Self {
            client,
            transcript,
            loading: false,
        }
    }

    pub fn client(&self) -> &AguiClient {
        &self.client
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drop the conversation, keeping the greeting.
    pub fn reset(&mut self) {
        self.transcript.reset(true);
    }

    /// Send `input` and run the turn to completion.
    ///
    /// The input is trimmed and whitespace-only input is rejected. Errors
    /// never escape: they are turned into [`CONNECTION_ERROR_MESSAGE`] in the
    /// transcript and returned in [`SendOutcome::Failed`] for logging.
    pub async fn send<O>(&mut self, input: &str, observer: &mut O) -> SendOutcome
    where
        O: TurnObserver + ?Sized,
    {
        let input = input.trim();
        if input.is_empty() || self.loading {
            return SendOutcome::Rejected;
        }

        self.transcript.push_user(input);

        let outcome = {
            let _loading = LoadingGuard::set(&mut self.loading);
            match run_turn(&self.client, &mut self.transcript, observer).await {
                Ok(deltas) => SendOutcome::Completed { deltas },
                Err(e) => {
                    log::warn!("chat request failed: {}", e);
                    self.transcript.push_assistant(CONNECTION_ERROR_MESSAGE);
                    SendOutcome::Failed(e)
                }
            }
        };

        observer.on_finished(&outcome);
        outcome
    }

    /// [`Self::send`] with a closure observer.
    pub async fn send_with<F>(&mut self, input: &str, mut on_update: F) -> SendOutcome
    where
        F: FnMut(&TurnUpdate<'_>),
    {
        self.send(input, &mut on_update).await
    }
}

/// Dispatch the request and fold its events into `transcript`.
///
/// The placeholder is appended only after the response has arrived, so a
/// request that never got an answer leaves no empty assistant message behind.
async fn run_turn<O>(
    client: &AguiClient,
    transcript: &mut Transcript,
    observer: &mut O,
) -> ChatResult<usize>
where
    O: TurnObserver + ?Sized,
{
    let mut events = client.run(&transcript.history()).await?;

    transcript.begin_assistant(INITIAL_AGENT_NAME);
    observer.on_started();

    let mut turn = TurnState::default();
    while let Some(event) = events.next().await {
        let event = event?;
        log::trace!("received {}", event.type_name());
        observer.on_event(&event);

        if turn.apply(transcript, &event) == Applied::Delta {
            if let (StreamEvent::TextMessageContent { delta, .. }, Some(message)) =
                (&event, transcript.last())
            {
                observer.on_delta(delta, message);
            }
        }
    }

    Ok(turn.deltas())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
