//! Chat-completions client for OpenAI-compatible providers (DeepSeek, OpenAI).
//!
//! Minimal, non-streaming client around the REST API. The endpoint is derived
//! from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/chat/completions: single-turn chat completion
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`. Nothing in
//! here retries: one call to [`ChatCompletionService::complete`] is one request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    completion::{Completion, CompletionProvider},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
    },
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Thin client for a chat-completions API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers), so one
/// instance should be built at startup and shared.
#[derive(Debug)]
pub struct ChatCompletionService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    provider: LlmProvider,
    url_chat: String,
}

impl ChatCompletionService {
    /// Creates a new [`ChatCompletionService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::Config`] with `InvalidFormat` if the key is not a valid header value
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let provider = cfg.provider;

        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(provider, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout_secs = cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            ConfigError::InvalidFormat {
                var: provider.api_key_var(),
                reason: "API key contains characters not allowed in an HTTP header",
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{}/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            provider = %provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs,
            "ChatCompletionService initialized"
        );

        Ok(Self {
            client,
            cfg,
            provider,
            url_chat,
        })
    }

    /// Model name sent with every request.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** single-turn chat completion.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures and timeouts
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyChoices` if no choice carries content
    pub async fn generate(&self, prompt: &str) -> Result<Completion, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(ProviderError::new(
                self.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::new(
                    self.provider,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `choices[0].message.content`"
                    )),
                )
                .into());
            }
        };

        let tokens_used = out.tokens_used();
        let text = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| ProviderError::new(self.provider, ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %self.cfg.model,
            tokens_used,
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(Completion { text, tokens_used })
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionService {
    async fn complete(&self, prompt: &str) -> Result<Completion, AiLlmError> {
        self.generate(prompt).await
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

impl ChatCompletionResponse {
    fn tokens_used(&self) -> u32 {
        self.usage
            .as_ref()
            .and_then(|u| u.total_tokens)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;

    fn cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::DeepSeek,
            model: "deepseek-chat".into(),
            endpoint,
            api_key: Some("sk-test".into()),
            max_tokens: Some(1000),
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn request_body_is_single_user_turn() {
        let cfg = cfg("https://api.deepseek.com".into());
        let body = serde_json::to_value(ChatCompletionRequest::from_cfg(&cfg, "What is 2+2?"))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "deepseek-chat",
                "messages": [{ "role": "user", "content": "What is 2+2?" }],
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn usage_defaults_to_zero() {
        let with: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "4" } }],
            "usage": { "total_tokens": 17 }
        }))
        .unwrap();
        assert_eq!(with.tokens_used(), 17);

        let without: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "4" } }]
        }))
        .unwrap();
        assert_eq!(without.tokens_used(), 0);
    }

    #[test]
    fn constructor_validates_key_and_endpoint() {
        let mut no_key = cfg("https://api.deepseek.com".into());
        no_key.api_key = None;
        assert!(matches!(
            ChatCompletionService::new(no_key),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            }))
        ));

        assert!(matches!(
            ChatCompletionService::new(cfg("ftp://example.com".into())),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            }))
        ));
    }

    #[test]
    fn request_body_carries_sampling_parameters() {
        let mut cfg = cfg("https://api.deepseek.com".into());
        cfg.temperature = Some(0.5);
        cfg.top_p = Some(0.25);
        let body = serde_json::to_value(ChatCompletionRequest::from_cfg(&cfg, "hi")).unwrap();
        assert_eq!(body["temperature"], json!(0.5));
        assert_eq!(body["top_p"], json!(0.25));
    }

    #[test]
    fn unusable_api_key_is_a_config_error() {
        let mut bad_key = cfg("https://api.deepseek.com".into());
        bad_key.api_key = Some("sk-line\nbreak".into());
        assert!(matches!(
            ChatCompletionService::new(bad_key),
            Err(AiLlmError::Config(ConfigError::InvalidFormat {
                var: "DEEPSEEK_API_KEY",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn sampling_parameters_reach_the_provider() {
        let router = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                let seen = format!("{}/{}", body["temperature"], body["top_p"]);
                Json(json!({ "choices": [{ "message": { "content": seen } }] }))
            }),
        );
        let base = serve(router).await;

        let mut cfg = cfg(base);
        cfg.temperature = Some(0.5);
        cfg.top_p = Some(0.25);
        let svc = ChatCompletionService::new(cfg).unwrap();
        let out = svc.complete("hello").await.unwrap();
        assert_eq!(out.text, "0.5/0.25");
    }

    #[tokio::test]
    async fn completes_against_compatible_server() {
        let router = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": format!("echo: {prompt}") } }],
                    "usage": { "prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5 }
                }))
            }),
        );
        let base = serve(router).await;

        let svc = ChatCompletionService::new(cfg(base)).unwrap();
        let out = svc.complete("hello").await.unwrap();
        assert_eq!(out.text, "echo: hello");
        assert_eq!(out.tokens_used, 5);
    }

    #[tokio::test]
    async fn non_success_status_is_provider_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let base = serve(router).await;

        let svc = ChatCompletionService::new(cfg(base)).unwrap();
        let err = svc.complete("hello").await.unwrap_err();
        match err {
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(http),
                ..
            }) => {
                assert_eq!(http.status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(http.snippet, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_are_rejected() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = serve(router).await;

        let svc = ChatCompletionService::new(cfg(base)).unwrap();
        assert!(matches!(
            svc.complete("hello").await,
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            }))
        ));
    }
}
