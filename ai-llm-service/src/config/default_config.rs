//! Default LLM config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_KIND`          = provider kind (`deepseek` default, `openai`)
//! - `DEEPSEEK_API_KEY`  = API key (mandatory for `deepseek`)
//! - `OPENAI_API_KEY`    = API key (mandatory for `openai`)
//! - `LLM_MODEL`         = model name (default depends on provider)
//! - `LLM_BASE_URL`      = API base URL (default depends on provider)
//! - `LLM_MAX_TOKENS`    = completion bound, u32 (default 1000)
//! - `LLM_TIMEOUT_SECS`  = request timeout, u64 (default 60)
//! - `LLM_TEMPERATURE`   = sampling temperature, f32 in `0.0..=2.0` (unset: provider default)
//! - `LLM_TOP_P`         = nucleus sampling, f32 in `0.0..=1.0` (unset: provider default)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, lookup_opt, lookup_opt_f32, lookup_opt_u32, lookup_opt_u64, must_lookup,
        validate_http_endpoint, validate_range_f32,
    },
};

/// Maximum completion length requested from the provider unless overridden.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Upstream request timeout unless overridden.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Builds the chat-completion config from the process environment.
///
/// # Errors
/// See [`config_from_lookup`].
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Builds the chat-completion config from an arbitrary variable lookup.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`ConfigError::MissingVar`] if the provider API key is absent
/// - [`ConfigError::InvalidNumber`] for malformed numeric values
/// - [`ConfigError::OutOfRange`] for `LLM_TEMPERATURE` / `LLM_TOP_P` outside their range
/// - [`ConfigError::InvalidFormat`] if `LLM_BASE_URL` is not http(s)
pub fn config_from_lookup<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match lookup_opt(&lookup, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::DeepSeek,
    };

    let api_key = must_lookup(&lookup, provider.api_key_var())?;

    let endpoint = lookup_opt(&lookup, "LLM_BASE_URL")
        .unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("LLM_BASE_URL", &endpoint)?;

    let model =
        lookup_opt(&lookup, "LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());

    let max_tokens = lookup_opt_u32(&lookup, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let timeout_secs =
        lookup_opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    let temperature = lookup_opt_f32(&lookup, "LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("LLM_TEMPERATURE", t, 0.0, 2.0, "expected 0.0..=2.0")?;
    }
    let top_p = lookup_opt_f32(&lookup, "LLM_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("LLM_TOP_P", p, 0.0, 1.0, "expected 0.0..=1.0")?;
    }

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(max_tokens),
        temperature,
        top_p,
        timeout_secs: Some(timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error_handler::ConfigError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn deepseek_defaults() {
        let cfg = config_from_lookup(lookup_from(&[("DEEPSEEK_API_KEY", "sk-test")])).unwrap();
        assert_eq!(cfg.provider, LlmProvider::DeepSeek);
        assert_eq!(cfg.model, "deepseek-chat");
        assert_eq!(cfg.endpoint, "https://api.deepseek.com");
        assert_eq!(cfg.max_tokens, Some(DEFAULT_MAX_TOKENS));
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.top_p, None);
    }

    #[test]
    fn sampling_parameters_are_read_and_range_checked() {
        let cfg = config_from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "k"),
            ("LLM_TEMPERATURE", "0.7"),
            ("LLM_TOP_P", " 0.9 "),
        ]))
        .unwrap();
        assert_eq!(cfg.temperature, Some(0.7));
        assert_eq!(cfg.top_p, Some(0.9));

        let hot = config_from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "k"),
            ("LLM_TEMPERATURE", "2.5"),
        ]));
        assert!(matches!(
            hot,
            Err(AiLlmError::Config(ConfigError::OutOfRange { var: "LLM_TEMPERATURE", .. }))
        ));

        let wide = config_from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "k"),
            ("LLM_TOP_P", "1.2"),
        ]));
        assert!(matches!(
            wide,
            Err(AiLlmError::Config(ConfigError::OutOfRange { var: "LLM_TOP_P", .. }))
        ));

        let word = config_from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "k"),
            ("LLM_TEMPERATURE", "warm"),
        ]));
        assert!(matches!(
            word,
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "LLM_TEMPERATURE", .. }))
        ));
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let err = config_from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DEEPSEEK_API_KEY"));
    }

    #[test]
    fn openai_kind_uses_its_own_key() {
        let cfg = config_from_lookup(lookup_from(&[
            ("LLM_KIND", "openai"),
            ("OPENAI_API_KEY", "sk-oa"),
            ("LLM_MAX_TOKENS", "64"),
        ]))
        .unwrap();
        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.endpoint, "https://api.openai.com/v1");
        assert_eq!(cfg.max_tokens, Some(64));
    }

    #[test]
    fn rejects_bad_numbers_and_urls() {
        let bad_tokens = config_from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "k"),
            ("LLM_MAX_TOKENS", "lots"),
        ]));
        assert!(matches!(
            bad_tokens,
            Err(AiLlmError::Config(ConfigError::InvalidNumber { .. }))
        ));

        let bad_url = config_from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "k"),
            ("LLM_BASE_URL", "api.deepseek.com"),
        ]));
        assert!(matches!(
            bad_url,
            Err(AiLlmError::Config(ConfigError::InvalidFormat { .. }))
        ));

        let bad_kind = config_from_lookup(lookup_from(&[("LLM_KIND", "claude")]));
        assert!(matches!(
            bad_kind,
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));
    }
}
