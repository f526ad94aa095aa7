//! Stream ingestion: response bytes to `data:` payloads to typed events.
//!
//! The body of an AG-UI response is newline-delimited. Lines starting with
//! `data: ` carry either the `[DONE]` sentinel or one JSON event; every other
//! line is ignored.
//!
//! Bytes are buffered until a newline arrives, so a line (or a multi-byte
//! character) split across network chunks is reassembled before it is
//! decoded. Whatever follows the last newline is carried over to the next
//! chunk and flushed as a final line when the body ends.
//!
//! # Example
//!
//! ```
//! use agui_chat_core::ingest::{events, DecodeErrorPolicy};
//! use agui_chat_core::StreamEvent;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let chunks: Vec<Result<&[u8], std::convert::Infallible>> = vec![
//!     Ok(&b"data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"del"[..]),
//!     Ok(&b"ta\":\"Hi\"}\ndata: [DONE]\n"[..]),
//! ];
//!
//! let collected: Vec<_> = events(futures::stream::iter(chunks), DecodeErrorPolicy::Skip)
//!     .collect()
//!     .await;
//! assert!(matches!(
//!     collected.as_slice(),
//!     [Ok(StreamEvent::TextMessageContent { delta, .. })] if delta == "Hi"
//! ));
//! # }
//! ```

use crate::error::{ChatError, ChatResult};
use crate::events::StreamEvent;
use futures::stream::Stream;
use futures::StreamExt;

/// Prefix that marks an event line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks the end of the event sequence.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What to do with a `data:` payload that does not decode as an event.
///
/// Chunked streams can legitimately deliver payloads a backend never meant as
/// events, so the default is to drop them and keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeErrorPolicy {
    /// Log the payload at debug level and continue with the next line.
    #[default]
    Skip,
    /// End the stream with [`ChatError::Decode`].
    Fail,
}

/// Classification of a single line of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// An event payload (the text after `data: `).
    Data(&'a str),
    /// The `[DONE]` sentinel.
    Done,
    /// Anything else: blank lines, comments, other SSE fields.
    Other,
}

/// Classify one line (without its terminator).
pub fn classify_line(line: &str) -> Line<'_> {
    match line.strip_prefix(DATA_PREFIX) {
        Some(DONE_SENTINEL) => Line::Done,
        Some(payload) => Line::Data(payload),
        None => Line::Other,
    }
}

/// Incremental splitter turning byte chunks into complete text lines.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes, in order.
    ///
    /// Bytes after the last newline stay buffered for the next call.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(pos) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos;
            lines.push(decode_line(&self.buffer[start..end]));
            start = end + 1;
        }
        self.buffer.drain(..start);

        lines
    }

    /// Flush the unterminated remainder once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(decode_line(&rest))
    }

    /// Number of bytes waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Decode one line, dropping a trailing `\r`. Invalid UTF-8 becomes U+FFFD.
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse one payload as an event.
pub fn decode_event(payload: &str) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Turn a byte stream into the sequence of non-sentinel `data:` payloads.
///
/// A transport error is yielded once as [`ChatError::Stream`] and ends the
/// sequence.
pub fn payloads<S, B, E>(bytes: S) -> impl Stream<Item = ChatResult<String>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut decoder = LineDecoder::new();
        futures::pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    for line in decoder.push(chunk.as_ref()) {
                        match classify_line(&line) {
                            Line::Data(payload) => yield Ok(payload.to_string()),
                            Line::Done => log::trace!("received {} sentinel", DONE_SENTINEL),
                            Line::Other => {}
                        }
                    }
                }
                Err(e) => {
                    yield Err(ChatError::Stream(e.to_string()));
                    return;
                }
            }
        }

        if let Some(line) = decoder.finish() {
            if let Line::Data(payload) = classify_line(&line) {
                yield Ok(payload.to_string());
            }
        }
    }
}

/// Turn a byte stream into typed events, applying `policy` to payloads that
/// fail to decode.
pub fn events<S, B, E>(
    bytes: S,
    policy: DecodeErrorPolicy,
) -> impl Stream<Item = ChatResult<StreamEvent>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let payloads = payloads(bytes);
        futures::pin_mut!(payloads);

        while let Some(item) = payloads.next().await {
            let payload = match item {
                Ok(payload) => payload,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            match decode_event(&payload) {
                Ok(event) => yield Ok(event),
                Err(source) => match policy {
                    DecodeErrorPolicy::Skip => {
                        log::debug!(
                            "skipping undecodable event payload {:?}: {}",
                            payload,
                            source
                        );
                    }
                    DecodeErrorPolicy::Fail => {
                        yield Err(ChatError::Decode { payload, source });
                        return;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
