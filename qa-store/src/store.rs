use async_trait::async_trait;

use crate::{
    errors::StoreError,
    record::{Exchange, NewExchange},
};

/// Write-once storage of exchanges.
///
/// Implementations are shared across request handlers behind an `Arc`, so
/// they must be `Send + Sync` and must not rely on per-request mutable state.
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    /// Short backend name for introspection (e.g. `"supabase"`).
    fn backend(&self) -> &'static str;

    /// Persists a new exchange and returns it with its assigned id.
    async fn insert(&self, new: NewExchange) -> Result<Exchange, StoreError>;

    /// Returns at most `limit` exchanges, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<Exchange>, StoreError>;

    /// Total number of stored exchanges.
    async fn count(&self) -> Result<u64, StoreError>;
}
