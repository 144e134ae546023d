//! Common test utilities: in-memory stand-ins for the API server

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use kubedash_api::auth::AccessReviewer;
use kubedash_api::config::AuthConfig;
use kubedash_api::kubernetes::poddefault::{PodDefault, REGISTRY_PODDEFAULT_NAME};
use kubedash_api::kubernetes::secrets::DOCKER_CONFIG_JSON_TYPE;
use kubedash_api::kubernetes::{ClusterProbe, K8sError, K8sResult, RegistryBackend};
use kubedash_api::{routes, AppState};
use kubedash_common::{RegistryCredential, ResourceAction};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const USER_HEADER: &str = "kubeflow-userid";

/// Build a kube API error the way the API server reports it
pub fn api_error(code: u16, reason: &str, message: &str) -> K8sError {
    K8sError::KubeError(kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    }))
}

#[derive(Default)]
struct ClusterState {
    /// (namespace, name) -> secret type
    secrets: BTreeMap<(String, String), String>,
    poddefaults: BTreeMap<(String, String), PodDefault>,
    calls: Vec<String>,
    fail_apply: bool,
    fail_list: bool,
}

/// In-memory secrets and PodDefaults. Every call is recorded.
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<ClusterState>,
}

impl FakeCluster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_secret(self: &Arc<Self>, namespace: &str, name: &str, secret_type: &str) -> Arc<Self> {
        self.state.lock().unwrap().secrets.insert(
            (namespace.to_string(), name.to_string()),
            secret_type.to_string(),
        );
        self.clone()
    }

    pub fn with_poddefault(self: &Arc<Self>, namespace: &str, poddefault: PodDefault) -> Arc<Self> {
        let name = poddefault.metadata.name.clone().unwrap_or_default();
        self.state
            .lock()
            .unwrap()
            .poddefaults
            .insert((namespace.to_string(), name), poddefault);
        self.clone()
    }

    pub fn fail_poddefault_apply(&self) {
        self.state.lock().unwrap().fail_apply = true;
    }

    pub fn fail_secret_list(&self) {
        self.state.lock().unwrap().fail_list = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn has_secret(&self, namespace: &str, name: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .secrets
            .contains_key(&(namespace.to_string(), name.to_string()))
    }

    /// Pull secrets referenced by the registry PodDefault, if it exists
    pub fn registry_poddefault_secrets(&self, namespace: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .poddefaults
            .get(&(namespace.to_string(), REGISTRY_PODDEFAULT_NAME.to_string()))
            .map(|pd| pd.pull_secret_names())
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RegistryBackend for FakeCluster {
    async fn create_registry_secret(&self, credential: &RegistryCredential) -> K8sResult<()> {
        self.record(format!("create_secret {}/{}", credential.namespace, credential.name));

        let mut state = self.state.lock().unwrap();
        let key = (credential.namespace.clone(), credential.name.clone());
        if state.secrets.contains_key(&key) {
            return Err(api_error(
                409,
                "AlreadyExists",
                &format!("secrets \"{}\" already exists", credential.name),
            ));
        }
        state.secrets.insert(key, DOCKER_CONFIG_JSON_TYPE.to_string());
        Ok(())
    }

    async fn list_registry_secrets(&self, namespace: &str) -> K8sResult<Vec<String>> {
        self.record(format!("list_secrets {}", namespace));

        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(K8sError::Internal("connection refused".to_string()));
        }
        Ok(state
            .secrets
            .iter()
            .filter(|((ns, _), ty)| ns == namespace && ty.as_str() == DOCKER_CONFIG_JSON_TYPE)
            .map(|((_, name), _)| name.clone())
            .collect())
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> K8sResult<()> {
        self.record(format!("delete_secret {}/{}", namespace, name));

        let mut state = self.state.lock().unwrap();
        match state.secrets.remove(&(namespace.to_string(), name.to_string())) {
            Some(_) => Ok(()),
            None => Err(api_error(
                404,
                "NotFound",
                &format!("secrets \"{}\" not found", name),
            )),
        }
    }

    async fn apply_poddefault(&self, poddefault: &PodDefault) -> K8sResult<()> {
        let namespace = poddefault.metadata.namespace.clone().unwrap_or_default();
        let name = poddefault.metadata.name.clone().unwrap_or_default();
        self.record(format!("apply_poddefault {}/{}", namespace, name));

        let mut state = self.state.lock().unwrap();
        if state.fail_apply {
            return Err(api_error(
                500,
                "InternalError",
                "Internal error occurred: failed calling webhook",
            ));
        }
        state.poddefaults.insert((namespace, name), poddefault.clone());
        Ok(())
    }

    async fn list_poddefaults(&self, namespace: &str) -> K8sResult<Vec<PodDefault>> {
        self.record(format!("list_poddefaults {}", namespace));

        let state = self.state.lock().unwrap();
        Ok(state
            .poddefaults
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, pd)| pd.clone())
            .collect())
    }
}

#[async_trait]
impl ClusterProbe for FakeCluster {
    async fn server_version(&self) -> K8sResult<String> {
        if self.state.lock().unwrap().fail_list {
            return Err(K8sError::Internal("connection refused".to_string()));
        }
        Ok("v1.32.0".to_string())
    }
}

/// Authorization engine that allows everything except the listed
/// `(verb, resource)` pairs, or fails every call.
#[derive(Default)]
pub struct FakeReviewer {
    denied: Vec<(String, String)>,
    unavailable: bool,
    reviews: Mutex<Vec<(String, ResourceAction)>>,
}

impl FakeReviewer {
    pub fn allow_all() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deny(rules: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            denied: rules
                .iter()
                .map(|(verb, resource)| (verb.to_string(), resource.to_string()))
                .collect(),
            ..Default::default()
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            unavailable: true,
            ..Default::default()
        })
    }

    pub fn reviews(&self) -> Vec<(String, ResourceAction)> {
        self.reviews.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccessReviewer for FakeReviewer {
    async fn review(&self, user: &str, action: &ResourceAction) -> K8sResult<bool> {
        self.reviews
            .lock()
            .unwrap()
            .push((user.to_string(), action.clone()));

        if self.unavailable {
            return Err(K8sError::Internal(
                "dial tcp 10.96.0.1:443: connect: connection refused".to_string(),
            ));
        }
        Ok(!self
            .denied
            .iter()
            .any(|(verb, resource)| *verb == action.verb && *resource == action.resource))
    }
}

/// Router over the fakes
pub fn test_app(cluster: Arc<FakeCluster>, reviewer: Arc<FakeReviewer>, disable_auth: bool) -> Router {
    let auth = AuthConfig {
        disable_auth,
        ..AuthConfig::default()
    };

    routes::router(AppState::new(auth, reviewer, cluster.clone(), cluster))
}

/// Send a request and decode the JSON response body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, user: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, format!(":{}", user));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, format!(":{}", user));
    }
    builder.body(Body::empty()).unwrap()
}
