//! Application State
//!
//! Shared state for the kubedash API server

use std::sync::Arc;
use std::time::Instant;

use crate::auth::{AccessReviewer, Authorizer};
use crate::config::AuthConfig;
use crate::kubernetes::{ClusterProbe, RegistryBackend};
use crate::registry::RegistrySecretService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub authorizer: Authorizer,
    pub backend: Arc<dyn RegistryBackend>,
    pub secrets: Arc<RegistrySecretService>,
    pub cluster: Arc<dyn ClusterProbe>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire the gate and orchestrator over the given cluster seams
    pub fn new(
        auth: AuthConfig,
        reviewer: Arc<dyn AccessReviewer>,
        backend: Arc<dyn RegistryBackend>,
        cluster: Arc<dyn ClusterProbe>,
    ) -> Self {
        let authorizer = Authorizer::new(Arc::new(auth), reviewer);
        let secrets = RegistrySecretService::new(authorizer.clone(), backend.clone());

        Self {
            authorizer,
            backend,
            secrets: Arc::new(secrets),
            cluster,
            started_at: Instant::now(),
        }
    }
}
