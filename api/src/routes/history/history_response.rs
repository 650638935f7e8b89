use qa_store::Exchange;
use serde::Serialize;

/// Response payload for /api/history (inside the success envelope).
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Newest first.
    pub data: Vec<Exchange>,
    pub count: usize,
}
