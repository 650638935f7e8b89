use std::sync::Arc;

use ai_llm_service::{
    ChatCompletionService, CompletionProvider, config::default_config::config_from_env,
};
use qa_store::{ExchangeStore, InMemoryStore, SupabaseConfig, SupabaseStore};
use tracing::{info, warn};

use crate::{
    core::config::{ServerConfig, StoreBackend},
    error_handler::AppError,
};

/// Shared state for all HTTP handlers.
///
/// Built once at startup; handlers only read from it.
#[derive(Clone)]
pub struct AppState {
    /// Language model used to answer questions.
    pub llm: Arc<dyn CompletionProvider>,
    /// Where answered exchanges are persisted.
    pub store: Arc<dyn ExchangeStore>,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionProvider>, store: Arc<dyn ExchangeStore>) -> Self {
        Self { llm, store }
    }

    /// Builds the LLM and store clients from environment variables.
    pub fn from_config(config: &ServerConfig) -> Result<Self, AppError> {
        let llm_cfg = config_from_env()?;
        let llm = ChatCompletionService::new(llm_cfg)?;

        let store: Arc<dyn ExchangeStore> = match config.store {
            StoreBackend::Memory => {
                warn!("using in-memory store; exchanges are lost on restart");
                Arc::new(InMemoryStore::new())
            }
            StoreBackend::Supabase => {
                let cfg = SupabaseConfig::from_env()?;
                for warning in cfg.diagnose() {
                    warn!(%warning, "suspicious Supabase configuration");
                }
                Arc::new(SupabaseStore::new(&cfg)?)
            }
        };

        info!(model = %llm.model(), store = store.backend(), "application state ready");

        Ok(Self::new(Arc::new(llm), store))
    }
}
