//! HTTP client for AG-UI backends

use crate::config::{
    normalize_backend_url, ClientConfig, DEFAULT_BACKEND_URL, DEFAULT_CONNECT_TIMEOUT,
};
use crate::error::{ChatError, ChatResult};
use crate::events::StreamEvent;
use crate::ingest::{self, DecodeErrorPolicy};
use crate::rich;
use crate::transcript::HistoryMessage;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT};
use serde::Serialize;
use std::time::Duration;

/// Content type announced in the `Accept` header of run requests
const EVENT_STREAM: &str = "text/event-stream";

/// Stream of decoded events for one run
pub type EventStream = BoxStream<'static, ChatResult<StreamEvent>>;

#[derive(Serialize)]
struct RunRequest<'a> {
    messages: &'a [HistoryMessage<'a>],
}

/// Client for a single AG-UI backend
#[derive(Clone)]
pub struct AguiClient {
    http: reqwest::Client,
    backend_url: String,
    decode_policy: DecodeErrorPolicy,
    reject_error_status: bool,
}

impl std::fmt::Debug for AguiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AguiClient")
            .field("backend_url", &self.backend_url)
            .field("decode_policy", &self.decode_policy)
            .field("reject_error_status", &self.reject_error_status)
            .finish()
    }
}

impl AguiClient {
    /// Create a client for `backend_url` with default settings
    pub fn new(backend_url: impl Into<String>) -> ChatResult<Self> {
        Self::builder().backend_url(backend_url).build()
    }

    /// Create a client from a [`ClientConfig`]
    pub fn from_config(config: ClientConfig) -> ChatResult<Self> {
        let mut builder = Self::builder()
            .backend_url(config.backend_url)
            .connect_timeout(config.connect_timeout)
            .decode_policy(config.decode_policy);
        if let Some(timeout) = config.request_timeout {
            builder = builder.request_timeout(timeout);
        }
        builder.build()
    }

    /// Create a builder for more advanced configuration
    pub fn builder() -> AguiClientBuilder {
        AguiClientBuilder::new()
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn decode_policy(&self) -> DecodeErrorPolicy {
        self.decode_policy
    }

    /// Start a run with the given conversation history.
    ///
    /// Resolves once the response headers have arrived; the returned stream
    /// then yields events as the body is read. The body is read whatever the
    /// status, unless the client was built with
    /// [`AguiClientBuilder::reject_error_status`], in which case a
    /// non-success status is reported as [`ChatError::Status`].
    pub async fn run(&self, history: &[HistoryMessage<'_>]) -> ChatResult<EventStream> {
        let url = format!("{}/", self.backend_url);
        log::debug!("POST {} with {} messages", url, history.len());

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static(EVENT_STREAM))
            .json(&RunRequest { messages: history })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if self.reject_error_status {
                let body = response.text().await.unwrap_or_default();
                return Err(ChatError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            log::warn!("backend answered {} for {}, reading body anyway", status, url);
        }

        Ok(ingest::events(response.bytes_stream(), self.decode_policy).boxed())
    }

    /// URL of a server-side image
    pub fn image_url(&self, image_id: &str) -> String {
        rich::image_url(&self.backend_url, image_id)
    }

    /// Download a server-side image
    pub async fn fetch_image(&self, image_id: &str) -> ChatResult<Vec<u8>> {
        let url = self.image_url(image_id);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Builder for [`AguiClient`]
///
/// Create with [`AguiClient::builder()`]. Every setting is optional; the
/// backend URL defaults to [`DEFAULT_BACKEND_URL`].
#[derive(Debug, Default)]
pub struct AguiClientBuilder {
    backend_url: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    decode_policy: Option<DecodeErrorPolicy>,
    reject_error_status: bool,
}

impl AguiClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL
    pub fn backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = Some(backend_url.into());
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound the whole request, body included (unbounded by default)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set how undecodable payloads are handled
    pub fn decode_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.decode_policy = Some(policy);
        self
    }

    /// Fail runs answered with a non-success status instead of reading
    /// their body (off by default)
    pub fn reject_error_status(mut self, reject: bool) -> Self {
        self.reject_error_status = reject;
        self
    }

    /// Build the client
    pub fn build(self) -> ChatResult<AguiClient> {
        let backend_url =
            normalize_backend_url(self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL));

        let parsed = reqwest::Url::parse(&backend_url).map_err(|e| {
            ChatError::Configuration(format!("invalid backend URL {:?}: {}", backend_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ChatError::Configuration(format!(
                "backend URL must be http or https, got {:?}",
                backend_url
            )));
        }

        let mut http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT));
        if let Some(timeout) = self.request_timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|e| {
            ChatError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(AguiClient {
            http,
            backend_url,
            decode_policy: self.decode_policy.unwrap_or_default(),
            reject_error_status: self.reject_error_status,
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
