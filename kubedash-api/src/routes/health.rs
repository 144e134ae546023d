//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub alive: bool,
    pub uptime_seconds: u64,
    pub timestamp: i64,
}

/// Readiness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_server_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: i64,
}

pub async fn liveness_probe(State(state): State<AppState>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        alive: true,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Ready once the API server answers a version request
pub async fn readiness_probe(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let timestamp = chrono::Utc::now().timestamp();

    match state.cluster.server_version().await {
        Ok(version) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                api_server_version: Some(version),
                reason: None,
                timestamp,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    ready: false,
                    api_server_version: None,
                    reason: Some("Kubernetes API server unreachable".to_string()),
                    timestamp,
                }),
            )
        }
    }
}
