//! Supabase (PostgREST) client for the exchange table.
//!
//! Endpoints used:
//!   * POST {url}/rest/v1/{table}: insert, `Prefer: return=representation`
//!   * GET  {url}/rest/v1/{table}?order=...&limit: newest-first page
//!   * HEAD {url}/rest/v1/{table}?select=*: exact count via `Content-Range`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Response,
    header::{self, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::{
    config::SupabaseConfig,
    errors::StoreError,
    record::{Exchange, NewExchange},
    store::ExchangeStore,
};

const EXCHANGE_COLUMNS: &str = "id,question,answer,created_at";

/// HTTP client wrapper for one Supabase table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    table_url: String,
}

impl SupabaseStore {
    /// Builds the client with auth headers and timeout baked in.
    ///
    /// # Errors
    /// - [`StoreError::Config`] if the key cannot be used as a header value
    /// - [`StoreError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: &SupabaseConfig) -> Result<Self, StoreError> {
        let key = cfg.api_key.trim();
        let invalid_key = |_| StoreError::Config("Supabase key is not a valid header value".into());

        let mut apikey = HeaderValue::from_str(key).map_err(invalid_key)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid_key)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(header::AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let table_url = cfg.table_url();
        info!(
            table_url = %table_url,
            timeout_secs = cfg.timeout_secs,
            "SupabaseStore initialized"
        );

        Ok(Self { http, table_url })
    }
}

#[async_trait]
impl ExchangeStore for SupabaseStore {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    async fn insert(&self, new: NewExchange) -> Result<Exchange, StoreError> {
        debug!(question_len = new.question().len(), "POST {}", self.table_url);

        let resp = self
            .http
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&[&new])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let rows: Vec<Exchange> = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("insert representation: {e}")))?;

        rows.into_iter().next().ok_or(StoreError::EmptyInsert)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Exchange>, StoreError> {
        let limit = limit.to_string();
        debug!(limit = %limit, "GET {}", self.table_url);

        let resp = self
            .http
            .get(&self.table_url)
            .query(&[
                ("select", EXCHANGE_COLUMNS),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        resp.json()
            .await
            .map_err(|e| StoreError::Decode(format!("exchange list: {e}")))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        debug!("HEAD {}", self.table_url);

        let resp = self
            .http
            .head(&self.table_url)
            .query(&[("select", "*")])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let range = resp
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Decode("missing Content-Range header".into()))?;

        parse_content_range_total(range)
            .ok_or_else(|| StoreError::Decode(format!("unexpected Content-Range: {range}")))
    }
}

/// PostgREST error object.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Passes 2xx responses through and turns everything else into
/// [`StoreError::Rejected`].
async fn ensure_success(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<PostgrestError>(&body).ok();

    let code = parsed.as_ref().and_then(|p| p.code.clone());
    let message = parsed
        .and_then(|p| p.message)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(240).collect())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    error!(%status, %url, code = ?code, %message, "Supabase request rejected");

    Err(StoreError::Rejected {
        status,
        code,
        message,
    })
}

/// Extracts the total from a `Content-Range` value such as `0-24/3573` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}
