//! Authorization gate
//!
//! Every gated operation asks the API server's authorization engine through
//! a SubjectAccessReview. Decisions are never cached.

use async_trait::async_trait;
use axum::http::HeaderMap;
use k8s_openapi::api::authorization::v1::{
    ResourceAttributes, SubjectAccessReview, SubjectAccessReviewSpec,
};
use kube::api::{Api, PostParams};
use kubedash_common::ResourceAction;
use std::sync::Arc;
use thiserror::Error;

use super::authn::user_identity;
use crate::config::AuthConfig;
use crate::kubernetes::{K8sClient, K8sError, K8sResult};

/// Why an action was not authorized.
///
/// `EngineUnavailable` deliberately carries no detail: the underlying
/// failure is logged server-side only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("No user identity found in request")]
    Unauthenticated,

    #[error("User '{user}' is not authorized to {action}")]
    Denied { user: String, action: ResourceAction },

    #[error("Authorization failed")]
    EngineUnavailable,
}

/// Asks an authorization engine whether `user` may perform `action`
#[async_trait]
pub trait AccessReviewer: Send + Sync {
    async fn review(&self, user: &str, action: &ResourceAction) -> K8sResult<bool>;
}

/// Build the SubjectAccessReview for `user` performing `action`
pub fn subject_access_review(user: &str, action: &ResourceAction) -> SubjectAccessReview {
    SubjectAccessReview {
        spec: SubjectAccessReviewSpec {
            user: Some(user.to_string()),
            resource_attributes: Some(ResourceAttributes {
                namespace: action.namespace.clone(),
                verb: Some(action.verb.clone()),
                group: Some(action.group.clone()),
                version: Some(action.version.clone()),
                resource: Some(action.resource.clone()),
                subresource: action.subresource.clone(),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// `AccessReviewer` that creates SubjectAccessReviews on the API server
#[derive(Debug, Clone)]
pub struct KubeAccessReviewer {
    client: K8sClient,
}

impl KubeAccessReviewer {
    pub fn new(client: K8sClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccessReviewer for KubeAccessReviewer {
    async fn review(&self, user: &str, action: &ResourceAction) -> K8sResult<bool> {
        let api: Api<SubjectAccessReview> = Api::all(self.client.inner().clone());
        let review = api
            .create(&PostParams::default(), &subject_access_review(user, action))
            .await?;

        review
            .status
            .map(|status| status.allowed)
            .ok_or_else(|| {
                K8sError::MalformedResponse("SubjectAccessReview has no status".to_string())
            })
    }
}

/// Gate in front of every cluster mutation or read done on a caller's behalf
#[derive(Clone)]
pub struct Authorizer {
    config: Arc<AuthConfig>,
    reviewer: Arc<dyn AccessReviewer>,
}

impl Authorizer {
    pub fn new(config: Arc<AuthConfig>, reviewer: Arc<dyn AccessReviewer>) -> Self {
        Self { config, reviewer }
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disable_auth
    }

    /// Succeeds when authorization is disabled or the engine allows the
    /// caller identified by `headers` to perform `action`.
    pub async fn ensure_authorized(
        &self,
        headers: &HeaderMap,
        action: &ResourceAction,
    ) -> Result<(), AuthzError> {
        if self.is_disabled() {
            return Ok(());
        }

        let user = user_identity(headers, &self.config).ok_or(AuthzError::Unauthenticated)?;

        match self.reviewer.review(&user, action).await {
            Ok(true) => {
                tracing::debug!(user = %user, action = %action, "Access allowed");
                Ok(())
            }
            Ok(false) => {
                tracing::info!(user = %user, action = %action, "Access denied");
                Err(AuthzError::Denied {
                    user,
                    action: action.clone(),
                })
            }
            Err(e) => {
                tracing::error!(user = %user, action = %action, error = %e, "Error during SubjectAccessReview");
                Err(AuthzError::EngineUnavailable)
            }
        }
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("config", &self.config)
            .finish()
    }
}
