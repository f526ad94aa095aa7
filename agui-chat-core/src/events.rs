//! AG-UI protocol events as received by the client.
//!
//! Every `data:` line of the response stream carries one JSON object with a
//! `type` field in SCREAMING_SNAKE_CASE. Field names are camelCase on the
//! wire; snake_case spellings of the ids are accepted as well.
//!
//! Only [`StreamEvent::TextMessageStart`] and
//! [`StreamEvent::TextMessageContent`] change the transcript. The rest are
//! decoded so front ends can show tool activity and run errors; any `type`
//! this client does not know becomes [`StreamEvent::Unknown`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// AG-UI protocol events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum StreamEvent {
    // ===== Lifecycle Events =====
    /// Agent run started.
    RunStarted {
        #[serde(default, alias = "thread_id", skip_serializing_if = "Option::is_none")]
        thread_id: Option<String>,
        #[serde(default, alias = "run_id", skip_serializing_if = "Option::is_none")]
        run_id: Option<String>,
    },

    /// Agent run finished successfully.
    RunFinished {
        #[serde(default, alias = "thread_id", skip_serializing_if = "Option::is_none")]
        thread_id: Option<String>,
        #[serde(default, alias = "run_id", skip_serializing_if = "Option::is_none")]
        run_id: Option<String>,
    },

    /// Agent run failed with an error.
    RunError {
        /// Error message describing the failure.
        message: String,
        /// Optional error code.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    // ===== Text Message Events =====
    /// Start of a new text message.
    TextMessageStart {
        #[serde(
            default,
            alias = "message_id",
            deserialize_with = "lenient_id",
            skip_serializing_if = "Option::is_none"
        )]
        message_id: Option<String>,
        /// Role of the message author.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<MessageRole>,
    },

    /// Incremental content for a text message.
    TextMessageContent {
        #[serde(
            default,
            alias = "message_id",
            deserialize_with = "lenient_id",
            skip_serializing_if = "Option::is_none"
        )]
        message_id: Option<String>,
        /// Text delta to append.
        #[serde(default, deserialize_with = "lenient_text")]
        delta: String,
    },

    /// End of a text message.
    TextMessageEnd {
        #[serde(
            default,
            alias = "message_id",
            deserialize_with = "lenient_id",
            skip_serializing_if = "Option::is_none"
        )]
        message_id: Option<String>,
    },

    // ===== Tool Call Events =====
    /// Start of a tool call.
    ToolCallStart {
        #[serde(alias = "tool_call_id")]
        tool_call_id: String,
        #[serde(alias = "tool_call_name")]
        tool_call_name: String,
        #[serde(
            default,
            alias = "parent_message_id",
            skip_serializing_if = "Option::is_none"
        )]
        parent_message_id: Option<String>,
    },

    /// Incremental arguments for a tool call.
    ToolCallArgs {
        #[serde(alias = "tool_call_id")]
        tool_call_id: String,
        /// JSON argument delta.
        #[serde(default)]
        delta: String,
    },

    /// End of tool call arguments.
    ToolCallEnd {
        #[serde(alias = "tool_call_id")]
        tool_call_id: String,
    },

    /// Result from a tool call.
    ToolCallResult {
        #[serde(
            default,
            alias = "message_id",
            deserialize_with = "lenient_id",
            skip_serializing_if = "Option::is_none"
        )]
        message_id: Option<String>,
        #[serde(alias = "tool_call_id")]
        tool_call_id: String,
        /// Result content (text or JSON string).
        #[serde(default)]
        content: String,
    },

    // ===== State Management Events =====
    /// Complete state snapshot.
    StateSnapshot {
        #[serde(default)]
        snapshot: Value,
    },

    /// Incremental state update (JSON Patch operations).
    StateDelta {
        #[serde(default)]
        delta: Value,
    },

    /// Any event type this client does not handle.
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// The wire name of the event type, for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            StreamEvent::RunStarted { .. } => "RUN_STARTED",
            StreamEvent::RunFinished { .. } => "RUN_FINISHED",
            StreamEvent::RunError { .. } => "RUN_ERROR",
            StreamEvent::TextMessageStart { .. } => "TEXT_MESSAGE_START",
            StreamEvent::TextMessageContent { .. } => "TEXT_MESSAGE_CONTENT",
            StreamEvent::TextMessageEnd { .. } => "TEXT_MESSAGE_END",
            StreamEvent::ToolCallStart { .. } => "TOOL_CALL_START",
            StreamEvent::ToolCallArgs { .. } => "TOOL_CALL_ARGS",
            StreamEvent::ToolCallEnd { .. } => "TOOL_CALL_END",
            StreamEvent::ToolCallResult { .. } => "TOOL_CALL_RESULT",
            StreamEvent::StateSnapshot { .. } => "STATE_SNAPSHOT",
            StreamEvent::StateDelta { .. } => "STATE_DELTA",
            StreamEvent::Unknown => "UNKNOWN",
        }
    }
}

/// Message author role as sent in `TEXT_MESSAGE_START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
    Developer,
    /// A role this client does not know.
    #[serde(other)]
    Other,
}

/// Message ids are opaque: numbers and other scalars are kept as their
/// JSON text, `null` counts as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id),
        Some(other) => Some(other.to_string()),
    })
}

/// Deltas may arrive as `null` (nothing to append) or as a bare number.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a text delta, got {}",
            other
        ))),
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
