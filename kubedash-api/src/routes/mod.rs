//! HTTP routes

pub mod health;
pub mod poddefaults;
pub mod secrets;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/secrets", secrets::routes())
        .route(
            "/api/namespaces/:namespace/poddefaults",
            get(poddefaults::list_poddefaults),
        )
        .route("/healthz", get(health::liveness_probe))
        .route("/readyz", get(health::readiness_probe))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
