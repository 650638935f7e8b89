//! Persistence for question/answer exchanges.
//!
//! This crate provides:
//! - the [`Exchange`] data model and its insert payload [`NewExchange`]
//! - the [`ExchangeStore`] seam used by the HTTP layer
//! - [`SupabaseStore`], a PostgREST client for a hosted Supabase table
//! - [`InMemoryStore`], a process-local store for local runs and tests
//!
//! Exchanges are write-once: the store API has no update or delete.

mod config;
mod errors;
mod memory;
mod record;
mod store;
mod supabase;

pub use config::{ConfigWarning, SupabaseConfig};
pub use errors::StoreError;
pub use memory::InMemoryStore;
pub use record::{Exchange, ExchangeId, NewExchange};
pub use store::ExchangeStore;
pub use supabase::SupabaseStore;
