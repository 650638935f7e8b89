use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{core::app_state::AppState, error_handler::AppError};

/// Routes advertised by `GET /`.
pub static ENDPOINTS: [&str; 4] = ["GET /", "POST /api/ask", "GET /api/history", "GET /health"];

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: &'static str,
    /// Configured store backend.
    pub database: &'static str,
    pub endpoints: &'static [&'static str],
}

/// Handler: GET /
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: format!("Q&A API Server v{}", env!("CARGO_PKG_VERSION")),
        status: "running",
        database: state.store.backend(),
        endpoints: &ENDPOINTS,
    })
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
