//! Client configuration and runtime backend discovery.

use crate::ingest::DecodeErrorPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8888";

/// Environment variables consulted by [`ClientConfig::from_env`], in order.
pub const BACKEND_URL_ENV_VARS: [&str; 2] = ["AGUI_SERVER_URL", "BACKEND_URL"];

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`AguiClient`](crate::client::AguiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the AG-UI backend.
    pub backend_url: String,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Optional bound on a whole request, streaming body included.
    /// `None` lets a stream run as long as the backend keeps it open.
    pub request_timeout: Option<Duration>,
    /// What to do with payloads that fail to decode.
    pub decode_policy: DecodeErrorPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
            decode_policy: DecodeErrorPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration with the backend URL taken from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Self::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend_url = BACKEND_URL_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map(|value| normalize_backend_url(&value))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Self {
            backend_url,
            ..Self::default()
        }
    }

    pub fn with_backend_url(mut self, backend_url: impl AsRef<str>) -> Self {
        self.backend_url = normalize_backend_url(backend_url.as_ref());
        self
    }
}

/// Strip trailing slashes so paths can be appended with `/`.
pub fn normalize_backend_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Body served by the same-origin runtime configuration endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    #[serde(default)]
    pub backend_url: Option<String>,
}

/// Ask the runtime configuration endpoint for the backend URL.
///
/// Called once at startup. Any failure (network, status, body, missing
/// value) is logged and answered with [`DEFAULT_BACKEND_URL`].
pub async fn resolve_backend_url(http: &reqwest::Client, config_url: &str) -> String {
    match fetch_runtime_config(http, config_url).await {
        Ok(RuntimeConfig {
            backend_url: Some(url),
        }) if !url.trim().is_empty() => normalize_backend_url(&url),
        Ok(_) => {
            log::info!("runtime config has no backendUrl, using {}", DEFAULT_BACKEND_URL);
            DEFAULT_BACKEND_URL.to_string()
        }
        Err(e) => {
            log::info!(
                "runtime config unavailable ({}), using {}",
                e,
                DEFAULT_BACKEND_URL
            );
            DEFAULT_BACKEND_URL.to_string()
        }
    }
}

async fn fetch_runtime_config(
    http: &reqwest::Client,
    config_url: &str,
) -> Result<RuntimeConfig, reqwest::Error> {
    http.get(config_url)
        .send()
        .await?
        .error_for_status()?
        .json::<RuntimeConfig>()
        .await
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
