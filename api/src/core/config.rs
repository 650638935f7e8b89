use thiserror::Error;

/// Port used when neither `API_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value in {var}: {reason}")]
    Invalid {
        var: &'static str,
        reason: &'static str,
    },
}

/// Which [`qa_store::ExchangeStore`] backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

/// Listener and wiring settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:3001`.
    pub address: String,
    pub store: StoreBackend,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `API_ADDRESS` wins over `PORT`; `QA_STORE` is `supabase` (default) or `memory`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let address = match get("API_ADDRESS") {
            Some(addr) => addr.trim().to_string(),
            None => {
                let port = match get("PORT") {
                    Some(p) => p.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                        var: "PORT",
                        reason: "expected u16",
                    })?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let store = match get("QA_STORE").map(|s| s.trim().to_ascii_lowercase()) {
            None => StoreBackend::Supabase,
            Some(s) if s == "supabase" => StoreBackend::Supabase,
            Some(s) if s == "memory" => StoreBackend::Memory,
            Some(_) => {
                return Err(ConfigError::Invalid {
                    var: "QA_STORE",
                    reason: "expected `supabase` or `memory`",
                });
            }
        };

        Ok(Self { address, store })
    }
}
