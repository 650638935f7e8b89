//! Process-local exchange store.
//!
//! Used for local runs without a Supabase project (`QA_STORE=memory`) and as
//! a real store in tests. Contents are lost on restart.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::StoreError,
    record::{Exchange, ExchangeId, NewExchange},
    store::ExchangeStore,
};

/// In-memory store assigning sequential integer ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<Vec<Exchange>>,
    last_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExchangeStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, new: NewExchange) -> Result<Exchange, StoreError> {
        let mut rows = self.rows.write().await;
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let exchange = new.into_exchange(ExchangeId::Int(id));
        rows.push(exchange.clone());
        Ok(exchange)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Exchange>, StoreError> {
        let rows = self.rows.read().await;
        let mut page: Vec<Exchange> = rows.clone();
        // Equal timestamps fall back to insertion order (higher id is newer).
        page.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        page.truncate(limit);
        Ok(page)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.rows.read().await.len() as u64)
    }
}
