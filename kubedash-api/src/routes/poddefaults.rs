//! PodDefault listing for the notebook spawner form

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use kubedash_common::ResourceAction;
use serde::Serialize;

use crate::error::ApiError;
use crate::kubernetes::PodDefault;
use crate::state::AppState;

/// A PodDefault plus the fields the spawner form renders
#[derive(Debug, Serialize)]
pub struct PodDefaultEntry {
    #[serde(flatten)]
    pub poddefault: PodDefault,
    pub label: String,
    pub desc: String,
}

impl From<PodDefault> for PodDefaultEntry {
    fn from(poddefault: PodDefault) -> Self {
        Self {
            label: poddefault.form_label(),
            desc: poddefault.form_desc(),
            poddefault,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PodDefaultsResponse {
    pub success: bool,
    pub status: u16,
    pub poddefaults: Vec<PodDefaultEntry>,
}

pub async fn list_poddefaults(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(namespace): Path<String>,
) -> Result<Json<PodDefaultsResponse>, ApiError> {
    state
        .authorizer
        .ensure_authorized(&headers, &ResourceAction::poddefaults("list", &namespace))
        .await?;

    let poddefaults: Vec<PodDefaultEntry> = state
        .backend
        .list_poddefaults(&namespace)
        .await
        .map_err(|e| ApiError::Internal(e.api_message()))?
        .into_iter()
        .map(PodDefaultEntry::from)
        .collect();

    tracing::info!(namespace = %namespace, count = poddefaults.len(), "Found poddefaults");

    Ok(Json(PodDefaultsResponse {
        success: true,
        status: 200,
        poddefaults,
    }))
}
