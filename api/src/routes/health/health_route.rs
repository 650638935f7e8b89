use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{info, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::now_timestamp},
    routes::health::health_response::{DatabaseStatus, HealthResponse, ServiceStatus},
};

/// Handler: GET /health
///
/// Probes the store with a count query and never fails: every outcome is
/// folded into the returned status.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let body = match state.store.count().await {
        Ok(count) => {
            info!(questions_count = count, "health: store connected");
            HealthResponse {
                status: ServiceStatus::Healthy,
                database: DatabaseStatus::Connected,
                questions_count: Some(count),
                error: None,
                timestamp: now_timestamp(),
            }
        }
        Err(err) if err.is_store_reported() => {
            warn!(error = %err, "health: store reported an error");
            HealthResponse {
                status: ServiceStatus::Healthy,
                database: DatabaseStatus::Disconnected,
                questions_count: Some(0),
                error: None,
                timestamp: now_timestamp(),
            }
        }
        Err(err) => {
            warn!(error = %err, "health: store probe failed");
            HealthResponse {
                status: ServiceStatus::Degraded,
                database: DatabaseStatus::Error,
                questions_count: None,
                error: Some(err.to_string()),
                timestamp: now_timestamp(),
            }
        }
    };

    Json(body)
}
