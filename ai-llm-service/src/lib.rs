//! Chat-completion client for OpenAI-compatible LLM providers.
//!
//! The crate exposes one seam, [`CompletionProvider`], and one production
//! implementation, [`ChatCompletionService`]. Configuration is read from the
//! environment by [`config::default_config`].

pub mod completion;
pub mod config;
pub mod error_handler;
pub mod services;

pub use completion::{Completion, CompletionProvider};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use services::chat_completion_service::ChatCompletionService;
