//! Conversation transcript and the per-request event accumulator.

use crate::events::{MessageRole, StreamEvent};
use serde::{Deserialize, Serialize};

/// Agent name stamped on the placeholder before the backend says anything.
pub const INITIAL_AGENT_NAME: &str = "OrchestratorAgent";

/// Agent name used once a `TEXT_MESSAGE_START` arrives. The event carries no
/// agent identifier, so a fixed label is used.
pub const DEFAULT_AGENT_NAME: &str = "Assistant";

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            agent_name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            agent_name: None,
        }
    }
}

/// A message as sent back to the backend: role and content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Ordered conversation history.
///
/// Messages are only ever appended; the last one is mutated while a stream
/// is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript with an assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append a complete assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Append the empty in-progress assistant message for a new request.
    pub fn begin_assistant(&mut self, agent_name: impl Into<String>) {
        self.messages.push(Message {
            role: Role::Assistant,
            content: String::new(),
            agent_name: Some(agent_name.into()),
        });
    }

    /// The full history in request form.
    pub fn history(&self) -> Vec<HistoryMessage<'_>> {
        self.messages
            .iter()
            .map(|m| HistoryMessage {
                role: m.role,
                content: &m.content,
            })
            .collect()
    }

    /// Drop every message, keeping the first one if `keep_greeting` is set
    /// and it was written by the assistant.
    pub fn reset(&mut self, keep_greeting: bool) {
        let greeting = match self.messages.first() {
            Some(first) if keep_greeting && first.role == Role::Assistant => Some(first.clone()),
            _ => None,
        };
        self.messages.clear();
        self.messages.extend(greeting);
    }

    fn last_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut()
    }
}

/// What applying one event did to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new assistant turn started; the current agent name changed.
    AgentChanged,
    /// A delta was appended to the last message.
    Delta,
    /// The event does not affect the transcript.
    Ignored,
}

/// State carried across the events of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    agent_name: String,
    deltas: usize,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(INITIAL_AGENT_NAME)
    }
}

impl TurnState {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            deltas: 0,
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Number of deltas applied so far.
    pub fn deltas(&self) -> usize {
        self.deltas
    }

    /// Apply one event to the transcript.
    ///
    /// Deltas go to the last message, which must be the placeholder added by
    /// [`Transcript::begin_assistant`] for this request.
    pub fn apply(&mut self, transcript: &mut Transcript, event: &StreamEvent) -> Applied {
        match event {
            StreamEvent::TextMessageStart {
                role: Some(MessageRole::Assistant),
                ..
            } => {
                self.agent_name = DEFAULT_AGENT_NAME.to_string();
                Applied::AgentChanged
            }
            StreamEvent::TextMessageContent { delta, .. } if !delta.is_empty() => {
                let Some(message) = transcript.last_mut() else {
                    log::warn!("dropping delta: transcript has no message to append to");
                    return Applied::Ignored;
                };
                message.content.push_str(delta);
                message.agent_name = Some(self.agent_name.clone());
                self.deltas += 1;
                Applied::Delta
            }
            _ => Applied::Ignored,
        }
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
