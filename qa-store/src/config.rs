//! Supabase connection settings and startup diagnostics.

use std::fmt;

use crate::errors::StoreError;

const DEFAULT_TABLE: &str = "questions";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Anon (or publishable) key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Table holding the exchanges.
    pub table: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Suspicious-looking settings worth a log line; none of them is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    UrlContainsWhitespace,
    UrlNotHttps,
    UrlNotSupabaseHost,
    KeyNotRecognized,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigWarning::UrlContainsWhitespace => "SUPABASE_URL contains whitespace",
            ConfigWarning::UrlNotHttps => "SUPABASE_URL should start with https://",
            ConfigWarning::UrlNotSupabaseHost => "SUPABASE_URL does not end with .supabase.co",
            ConfigWarning::KeyNotRecognized => {
                "Supabase key is neither a JWT (eyJ...) nor a publishable key (sb_...)"
            }
        };
        f.write_str(msg)
    }
}

impl SupabaseConfig {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    /// See [`SupabaseConfig::from_lookup`].
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings from an arbitrary variable lookup.
    ///
    /// - `SUPABASE_URL` (required, http/https)
    /// - `SUPABASE_ANON_KEY`, falling back to `SUPABASE_KEY` (required)
    /// - `SUPABASE_TABLE` (default `questions`)
    /// - `STORE_TIMEOUT_SECS` (default 10)
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] for missing or malformed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = get("SUPABASE_URL")
            .ok_or_else(|| StoreError::Config("SUPABASE_URL must be set".into()))?;
        let trimmed = url.trim();
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(StoreError::Config(
                "SUPABASE_URL must start with http:// or https://".into(),
            ));
        }

        let api_key = get("SUPABASE_ANON_KEY")
            .or_else(|| get("SUPABASE_KEY"))
            .ok_or_else(|| {
                StoreError::Config("SUPABASE_ANON_KEY (or SUPABASE_KEY) must be set".into())
            })?;

        let table = get("SUPABASE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let timeout_secs = match get("STORE_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| {
                StoreError::Config("STORE_TIMEOUT_SECS must be an unsigned integer".into())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            url,
            api_key,
            table,
            timeout_secs,
        })
    }

    /// Base REST URL of the exchange table.
    pub fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.url.trim().trim_end_matches('/'),
            self.table
        )
    }

    /// Checks the settings for common copy/paste mistakes.
    pub fn diagnose(&self) -> Vec<ConfigWarning> {
        let mut out = Vec::new();
        let url = self.url.as_str();

        if url.chars().any(char::is_whitespace) {
            out.push(ConfigWarning::UrlContainsWhitespace);
        }
        let url = url.trim();
        if !url.starts_with("https://") {
            out.push(ConfigWarning::UrlNotHttps);
        }
        if !url.trim_end_matches('/').ends_with(".supabase.co") {
            out.push(ConfigWarning::UrlNotSupabaseHost);
        }

        let key = self.api_key.trim();
        if !(key.starts_with("eyJ") || key.starts_with("sb_")) {
            out.push(ConfigWarning::KeyNotRecognized);
        }

        out
    }
}
