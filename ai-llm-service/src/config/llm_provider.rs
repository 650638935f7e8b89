use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Provider (backend) serving the chat-completions API.
///
/// Both variants speak the same OpenAI-compatible protocol; they only differ
/// in their default endpoint, default model and API key variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// DeepSeek cloud API.
    DeepSeek,
    /// OpenAI cloud API.
    OpenAI,
}

impl LlmProvider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "https://api.deepseek.com",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "deepseek-chat",
            LlmProvider::OpenAI => "gpt-4o-mini",
        }
    }

    /// Environment variable holding the API key for this provider.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "DEEPSEEK_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::DeepSeek => f.write_str("DeepSeek"),
            LlmProvider::OpenAI => f.write_str("OpenAI"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Ok(LlmProvider::DeepSeek),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
