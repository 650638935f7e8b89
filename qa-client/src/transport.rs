//! Transport between the form and the Q&A server.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default client-side timeout; leaves headroom over the server's LLM timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server URL: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Decoded server reply. Error envelopes decode too, with `success: false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AskReply {
    pub success: bool,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Something that can deliver a question to the Q&A server.
#[async_trait]
pub trait AskTransport: Send + Sync {
    async fn ask(&self, question: &str) -> Result<AskReply, TransportError>;
}

#[derive(Serialize)]
struct AskPayload<'a> {
    question: &'a str,
}

/// `POST {base_url}/api/ask` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpAskTransport {
    http: reqwest::Client,
    ask_url: String,
}

impl HttpAskTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base = base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(TransportError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            ask_url: format!("{base}/api/ask"),
        })
    }

    pub fn ask_url(&self) -> &str {
        &self.ask_url
    }
}

#[async_trait]
impl AskTransport for HttpAskTransport {
    async fn ask(&self, question: &str) -> Result<AskReply, TransportError> {
        let resp = self
            .http
            .post(&self.ask_url)
            .json(&AskPayload { question })
            .send()
            .await?;

        debug!(status = %resp.status(), "ask: response received");

        // Non-2xx replies still carry a JSON envelope worth decoding.
        Ok(resp.json::<AskReply>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpAskTransport::new("localhost:3001", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TransportError::InvalidBaseUrl(_)));
    }

    #[test]
    fn strips_trailing_slash() {
        let t = HttpAskTransport::new("http://localhost:3001/", Duration::from_secs(1)).unwrap();
        assert_eq!(t.ask_url(), "http://localhost:3001/api/ask");
    }

    #[tokio::test]
    async fn posts_question_and_decodes_answer() {
        let app = Router::new().route(
            "/api/ask",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "success": true,
                    "answer": format!("echo: {}", body["question"].as_str().unwrap_or("")),
                    "tokens_used": 3,
                    "saved_to_db": true,
                    "timestamp": "2025-01-01T00:00:00.000Z"
                }))
            }),
        );
        let base = serve(app).await;
        let t = HttpAskTransport::new(&base, Duration::from_secs(5)).unwrap();

        let reply = t.ask("hello").await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.answer.as_deref(), Some("echo: hello"));
    }

    #[tokio::test]
    async fn decodes_error_envelope() {
        let app = Router::new().route(
            "/api/ask",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": "Question is required" })),
                )
            }),
        );
        let base = serve(app).await;
        let t = HttpAskTransport::new(&base, Duration::from_secs(5)).unwrap();

        let reply = t.ask(" ").await.unwrap();
        assert!(!reply.success);
        assert!(reply.answer.is_none());
        assert_eq!(reply.error.as_deref(), Some("Question is required"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_error() {
        let app = Router::new().route("/api/ask", post(|| async { "plain text" }));
        let base = serve(app).await;
        let t = HttpAskTransport::new(&base, Duration::from_secs(5)).unwrap();

        assert!(matches!(t.ask("q").await, Err(TransportError::Http(_))));
    }
}
