use async_trait::async_trait;

use crate::error_handler::AiLlmError;

/// Generated text plus the token usage reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// `usage.total_tokens`, or 0 when the provider omits it.
    pub tokens_used: u32,
}

/// Anything that can turn a single user prompt into a [`Completion`].
///
/// Implementations perform exactly one upstream call per invocation and never
/// retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, AiLlmError>;
}
