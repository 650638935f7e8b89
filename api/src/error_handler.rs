use ai_llm_service::AiLlmError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qa_store::StoreError;
use thiserror::Error;

use crate::core::{config::ConfigError, http::response_envelope::ErrorBody};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    /// Caller's fault; never retried, nothing upstream is contacted.
    #[error("{0}")]
    InvalidInput(String),

    #[error("not found")]
    NotFound,

    // --- Upstream dependencies ---
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Non-fatal failure to persist an exchange. Logged, then reported to the
/// caller only as `saved_to_db: false`.
#[derive(Debug, Error)]
#[error("exchange not persisted: {0}")]
pub struct PersistenceWarning(#[from] pub StoreError);

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Llm(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::InvalidInput(msg) => ErrorBody::new(msg.clone(), None),
            AppError::NotFound => ErrorBody::new("Not found", None),
            // Provider details stay in the logs.
            AppError::Llm(_) => ErrorBody::new(
                "Internal server error",
                Some("Language model request failed".into()),
            ),
            AppError::Store(err) => ErrorBody::new(err.to_string(), None),
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                ErrorBody::new("Internal server error", None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Malformed bodies are the caller's fault too.
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::InvalidInput(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::InvalidInput("Question is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Store(StoreError::EmptyInsert).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_surface_their_message() {
        let body = AppError::Store(StoreError::Decode("bad row".into())).body();
        assert!(!body.success);
        assert_eq!(body.error, "failed to decode store response: bad row");
        assert!(body.message.is_none());
    }
}
