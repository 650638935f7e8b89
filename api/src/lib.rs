//! HTTP surface of the Q&A service.
//!
//! - `GET /`: capability listing
//! - `POST /api/ask`: answer a question and record the exchange
//! - `GET /api/history`: latest exchanges, newest first
//! - `GET /health`: store connectivity report

pub mod core;
pub mod error_handler;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub use crate::core::{app_state::AppState, config::ServerConfig};
pub use crate::error_handler::{AppError, AppResult};
pub use crate::routes::history::history_route::HISTORY_PAGE_SIZE;

use crate::routes::{
    ask::ask_question_route::ask_question,
    health::health_route::health,
    history::history_route::history,
    root::root_route::{ENDPOINTS, not_found, service_info},
};

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/ask", post(ask_question))
        .route("/api/history", get(history))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Binds the listener and serves until Ctrl+C.
pub async fn start(config: &ServerConfig, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .map_err(AppError::Bind)?;
    let local = listener.local_addr().map_err(AppError::Bind)?;

    info!(
        address = %local,
        store = state.store.backend(),
        endpoints = ?ENDPOINTS,
        "server is running"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
