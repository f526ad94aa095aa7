//! Backend selection and session construction

use crate::error::CliError;
use agui_chat_core::config::resolve_backend_url;
use agui_chat_core::{AguiClient, ChatSession, ClientConfig};

/// Where the backend URL comes from, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSource {
    /// Explicit URL (`--backend-url`).
    pub backend_url: Option<String>,
    /// Runtime configuration endpoint to ask (`--config-url`).
    pub config_url: Option<String>,
}

impl BackendSource {
    /// Pick the configuration: explicit URL, then the config endpoint (which
    /// falls back to the default on failure), then the environment.
    pub async fn resolve(&self, env: ClientConfig) -> ClientConfig {
        if let Some(url) = self.backend_url.as_deref() {
            return env.with_backend_url(url);
        }
        if let Some(config_url) = self.config_url.as_deref() {
            let url = resolve_backend_url(&reqwest::Client::new(), config_url).await;
            return env.with_backend_url(url);
        }
        env
    }
}

/// Build a ready-to-use chat session.
pub async fn connect(source: &BackendSource) -> Result<ChatSession, CliError> {
    let config = source.resolve(ClientConfig::from_env()).await;
    log::info!("using backend {}", config.backend_url);
    let client = AguiClient::from_config(config)?;
    Ok(ChatSession::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agui_chat_core::DEFAULT_BACKEND_URL;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn env_config() -> ClientConfig {
        ClientConfig::default().with_backend_url("http://from-env:1111")
    }

    #[tokio::test]
    async fn explicit_url_wins() {
        let source = BackendSource {
            backend_url: Some("http://flag:2222/".to_string()),
            config_url: Some("http://127.0.0.1:9/unused".to_string()),
        };
        let config = source.resolve(env_config()).await;
        assert_eq!(config.backend_url, "http://flag:2222");
    }

    #[tokio::test]
    async fn config_endpoint_beats_environment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/config"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"backendUrl": "http://runtime:3333"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = BackendSource {
            backend_url: None,
            config_url: Some(format!("{}/api/config", server.uri())),
        };
        let config = source.resolve(env_config()).await;
        assert_eq!(config.backend_url, "http://runtime:3333");
    }

    #[tokio::test]
    async fn failing_config_endpoint_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = BackendSource {
            backend_url: None,
            config_url: Some(format!("{}/api/config", server.uri())),
        };
        let config = source.resolve(env_config()).await;
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[tokio::test]
    async fn environment_is_last_resort() {
        let config = BackendSource::default().resolve(env_config()).await;
        assert_eq!(config.backend_url, "http://from-env:1111");
    }

    #[tokio::test]
    async fn connect_rejects_bad_url() {
        let source = BackendSource {
            backend_url: Some("not a url".to_string()),
            config_url: None,
        };
        let err = connect(&source).await.unwrap_err();
        assert!(matches!(err, CliError::Chat(_)));
    }
}
