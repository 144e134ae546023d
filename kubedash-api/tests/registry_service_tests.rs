//! RegistrySecretService without the HTTP layer

mod common;

use axum::http::{HeaderMap, HeaderValue};
use common::*;
use kubedash_api::auth::{Authorizer, AuthzError};
use kubedash_api::config::AuthConfig;
use kubedash_api::kubernetes::secrets::DOCKER_CONFIG_JSON_TYPE;
use kubedash_api::registry::{RegistrySecretService, ServiceError};
use kubedash_common::RegistryCredentialRequest;
use std::sync::Arc;

fn service(cluster: Arc<FakeCluster>, reviewer: Arc<FakeReviewer>) -> RegistrySecretService {
    let authorizer = Authorizer::new(Arc::new(AuthConfig::default()), reviewer);
    RegistrySecretService::new(authorizer, cluster)
}

fn caller(user: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_HEADER,
        HeaderValue::from_str(&format!(":{}", user)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_reconcile_empty_namespace_writes_empty_poddefault() {
    let cluster = FakeCluster::new();
    let svc = service(cluster.clone(), FakeReviewer::allow_all());

    let pd = svc.reconcile_poddefault("empty").await.unwrap();

    assert!(pd.pull_secret_names().is_empty());
    assert_eq!(cluster.registry_poddefault_secrets("empty"), Some(vec![]));
    assert_eq!(
        cluster.calls(),
        vec!["list_secrets empty", "apply_poddefault empty/registry-credentials"]
    );
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let cluster = FakeCluster::new()
        .with_secret("ns1", "b", DOCKER_CONFIG_JSON_TYPE)
        .with_secret("ns1", "a", DOCKER_CONFIG_JSON_TYPE);
    let svc = service(cluster.clone(), FakeReviewer::allow_all());

    let first = svc.reconcile_poddefault("ns1").await.unwrap();
    let second = svc.reconcile_poddefault("ns1").await.unwrap();

    assert_eq!(first.spec, second.spec);
    assert_eq!(first.pull_secret_names(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_denied_create_is_typed() {
    let cluster = FakeCluster::new();
    let svc = service(cluster.clone(), FakeReviewer::deny(&[("create", "secrets")]));

    let request = RegistryCredentialRequest {
        namespace: Some("ns1".to_string()),
        name: Some("reg1".to_string()),
        registry: Some("ghcr.io".to_string()),
        username: Some("u".to_string()),
        password: Some("p".to_string()),
        email: Some("e@x.com".to_string()),
    };
    let err = svc.create(&caller("carol"), request).await.unwrap_err();

    match err {
        ServiceError::Unauthorized(AuthzError::Denied { user, action }) => {
            assert_eq!(user, "carol");
            assert_eq!(action.verb, "create");
            assert_eq!(action.resource, "secrets");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(cluster.calls().is_empty());
}

#[tokio::test]
async fn test_validation_precedes_authorization() {
    let reviewer = FakeReviewer::unavailable();
    let svc = service(FakeCluster::new(), reviewer.clone());

    let err = svc
        .create(&caller("carol"), RegistryCredentialRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(err.to_string(), "Missing required fields");
    assert!(reviewer.reviews().is_empty());
}
