//! POST /api/ask: answers a question with the LLM and records the exchange.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use qa_store::{ExchangeId, ExchangeStore, NewExchange};
use tracing::{error, info, warn};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiResponse, now_timestamp},
    },
    error_handler::{AppError, AppResult, PersistenceWarning},
    routes::ask::ask_request::{AskRequest, AskResponse},
};

const PREVIEW_CHARS: usize = 50;

/// Handler: POST /api/ask
///
/// The LLM call always precedes the store write; a failed write downgrades to
/// `saved_to_db: false` while a failed LLM call fails the request.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3001/api/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is 2+2?"}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;

    let question = body
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Question is required".into()))?;

    info!(question = %preview(question), "ask_question: start");

    let completion = state.llm.complete(question).await.map_err(|err| {
        error!(error = %err, "ask_question: LLM call failed");
        AppError::from(err)
    })?;

    info!(tokens_used = completion.tokens_used, "ask_question: answered");

    let question_id = match persist_exchange(state.store.as_ref(), question, &completion.text).await
    {
        Ok(id) => Some(id),
        Err(warning) => {
            warn!(%warning, "ask_question: database save warning");
            None
        }
    };

    let body = AskResponse {
        answer: completion.text,
        tokens_used: completion.tokens_used,
        saved_to_db: question_id.is_some(),
        question_id,
        timestamp: now_timestamp(),
    };

    Ok(ApiResponse::success(body).into_response_with_status(StatusCode::OK))
}

/// Best-effort insert of the answered exchange.
async fn persist_exchange(
    store: &dyn ExchangeStore,
    question: &str,
    answer: &str,
) -> Result<ExchangeId, PersistenceWarning> {
    let record = NewExchange::new(question, answer, Utc::now())?;
    let saved = store.insert(record).await?;
    Ok(saved.id)
}

/// First characters of the question for log lines.
fn preview(question: &str) -> String {
    let mut chars = question.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_questions() {
        assert_eq!(preview("short"), "short");

        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);

        let long = "é".repeat(PREVIEW_CHARS + 5);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
