//! Registry secret routes, mounted under `/api/secrets`
//!
//! | Method | Path                       |
//! |--------|----------------------------|
//! | POST   | `/create`                  |
//! | GET    | `/list/:namespace`         |
//! | DELETE | `/delete/:namespace/:name` |
//!
//! Apart from missing fields (400), every failure is reported as a 500
//! whose message says which stage failed.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use kubedash_common::{MessageResponse, RegistryCredentialRequest};
use serde_json::Value;

use crate::error::ApiError;
use crate::registry::ServiceError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_secret))
        .route("/list/:namespace", get(list_secrets))
        .route("/delete/:namespace/:name", delete(delete_secret))
}

fn failure(context: &str, err: ServiceError) -> ApiError {
    match err {
        ServiceError::Validation(e) => ApiError::BadRequest(e.to_string()),
        other => ApiError::Internal(format!("{}: {}", context, other)),
    }
}

/// Read a create body field by field. A field counts as present when it
/// is truthy: `null`, `false`, `0` and `""` are missing, other scalars are
/// taken as their text and arrays or objects as compact JSON.
fn credential_request(body: &Value) -> RegistryCredentialRequest {
    let field = |key: &str| -> Option<String> {
        match body.get(key)? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    };

    RegistryCredentialRequest {
        namespace: field("namespace"),
        name: field("name"),
        registry: field("registry"),
        username: field("username"),
        password: field("password"),
        email: field("email"),
    }
}

/// Create a docker-registry secret and update the PodDefault
pub async fn create_secret(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    // an unreadable body is reported like an empty one
    let request = match payload {
        Ok(Json(body)) => credential_request(&body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected secret create body");
            RegistryCredentialRequest::default()
        }
    };

    let message = state
        .secrets
        .create(&headers, request)
        .await
        .map_err(|e| failure("Failed to create secret or update PodDefault", e))?;

    Ok(Json(MessageResponse::new(message)))
}

/// List dockerconfigjson secrets
pub async fn list_secrets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(namespace): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .secrets
        .list(&headers, &namespace)
        .await
        .map_err(|e| failure("Failed to list secrets", e))?;

    Ok(Json(names))
}

/// Delete a secret and update the PodDefault
pub async fn delete_secret(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .secrets
        .delete(&headers, &namespace, &name)
        .await
        .map_err(|e| failure("Failed to delete secret or update PodDefault", e))?;

    Ok(Json(MessageResponse::new(message)))
}
