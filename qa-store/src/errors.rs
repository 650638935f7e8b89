//! Unified error type for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or missing configuration.
    #[error("store config error: {0}")]
    Config(String),

    /// The store could not be reached (connect failure, timeout, TLS...).
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with an error object.
    #[error("store rejected request (HTTP {status}): {message}")]
    Rejected {
        status: StatusCode,
        /// PostgREST/Postgres error code, e.g. `42P01`.
        code: Option<String>,
        message: String,
    },

    /// The store answered successfully but the payload was not understood.
    #[error("failed to decode store response: {0}")]
    Decode(String),

    /// An insert returned no representation of the created row.
    #[error("insert returned no rows")]
    EmptyInsert,

    /// A record violated a data-model invariant before reaching the store.
    #[error("invalid record: {0}")]
    InvalidRecord(&'static str),
}

impl StoreError {
    /// True when the store itself reported the failure, as opposed to the
    /// request never getting a usable answer.
    pub fn is_store_reported(&self) -> bool {
        matches!(self, StoreError::Rejected { .. })
    }
}
