use crate::config::llm_provider::LlmProvider;

/// Configuration for a chat-completion model invocation.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::DeepSeek,
///     model: "deepseek-chat".to_string(),
///     endpoint: "https://api.deepseek.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(1000),
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.provider, LlmProvider::DeepSeek);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Backend serving the request.
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"deepseek-chat"`).
    pub model: String,

    /// API base URL; `/chat/completions` is appended to it.
    pub endpoint: String,

    /// Bearer token for the provider.
    pub api_key: Option<String>,

    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}
