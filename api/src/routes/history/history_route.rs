use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::{debug, error};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::history::history_response::HistoryResponse,
};

/// Fixed page size of the history listing.
pub const HISTORY_PAGE_SIZE: usize = 20;

/// Handler: GET /api/history
///
/// Unlike persistence on the ask path, a store failure here fails the request.
pub async fn history(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let mut data = state
        .store
        .recent(HISTORY_PAGE_SIZE)
        .await
        .map_err(|err| {
            error!(error = %err, "history: store query failed");
            AppError::from(err)
        })?;
    data.truncate(HISTORY_PAGE_SIZE);

    debug!(count = data.len(), "history: success");

    let body = HistoryResponse {
        count: data.len(),
        data,
    };
    Ok(ApiResponse::success(body).into_response_with_status(StatusCode::OK))
}
