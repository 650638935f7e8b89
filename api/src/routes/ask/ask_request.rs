use qa_store::ExchangeId;
use serde::{Deserialize, Serialize};

/// Request payload for /api/ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question. Absent and blank are both rejected.
    #[serde(default)]
    pub question: Option<String>,
}

/// Response payload for /api/ask (inside the success envelope).
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub tokens_used: u32,
    pub saved_to_db: bool,
    /// Present only when the exchange was persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<ExchangeId>,
    pub timestamp: String,
}
