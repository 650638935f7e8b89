use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    /// Probe succeeded.
    Connected,
    /// The store answered with an error object.
    Disconnected,
    /// The probe failed without a store answer.
    Error,
}

/// Response payload for /health. Always served with 200.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub database: DatabaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}
