//! Registry credential orchestration
//!
//! Each operation runs authorize -> mutate -> reconcile, every step gated on
//! the previous one. The PodDefault is always recomputed from the full list
//! of registry secrets in the namespace, never patched incrementally.
//!
//! A secret mutation that succeeds is not rolled back when the following
//! PodDefault upsert fails; the namespace stays inconsistent until the next
//! successful create or delete recomputes it.

use axum::http::HeaderMap;
use kubedash_common::{RegistryCredentialRequest, ResourceAction};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{Authorizer, AuthzError};
use crate::kubernetes::poddefault::{registry_poddefault, PodDefault};
use crate::kubernetes::{K8sError, RegistryBackend};

/// Failure of an orchestrated operation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] kubedash_common::Error),

    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error("{}", .0.api_message())]
    Upstream(#[from] K8sError),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Creates, lists and deletes registry secrets on behalf of a caller and
/// keeps the namespace's PodDefault in step.
#[derive(Clone)]
pub struct RegistrySecretService {
    authorizer: Authorizer,
    backend: Arc<dyn RegistryBackend>,
}

impl RegistrySecretService {
    pub fn new(authorizer: Authorizer, backend: Arc<dyn RegistryBackend>) -> Self {
        Self {
            authorizer,
            backend,
        }
    }

    /// Create a registry secret and recompute the namespace's PodDefault.
    ///
    /// Fields are validated before any authorization or API call.
    pub async fn create(
        &self,
        headers: &HeaderMap,
        request: RegistryCredentialRequest,
    ) -> ServiceResult<String> {
        let credential = request.validate()?;
        let namespace = credential.namespace.as_str();

        self.authorizer
            .ensure_authorized(headers, &ResourceAction::secrets("create", namespace))
            .await?;
        self.authorizer
            .ensure_authorized(headers, &ResourceAction::poddefaults("create", namespace))
            .await?;

        self.backend.create_registry_secret(&credential).await?;
        tracing::info!(namespace = %namespace, secret = %credential.name, "Created registry secret");

        self.reconcile_after_mutation(namespace, &credential.name)
            .await?;

        Ok(format!(
            "Secret {} created and PodDefault updated in namespace {}",
            credential.name, namespace
        ))
    }

    /// Names of the registry secrets in `namespace`
    pub async fn list(&self, headers: &HeaderMap, namespace: &str) -> ServiceResult<Vec<String>> {
        self.authorizer
            .ensure_authorized(headers, &ResourceAction::secrets("list", namespace))
            .await?;

        Ok(self.backend.list_registry_secrets(namespace).await?)
    }

    /// Delete a registry secret and recompute the namespace's PodDefault
    pub async fn delete(
        &self,
        headers: &HeaderMap,
        namespace: &str,
        name: &str,
    ) -> ServiceResult<String> {
        self.authorizer
            .ensure_authorized(headers, &ResourceAction::secrets("delete", namespace))
            .await?;
        // the PodDefault is rewritten, so deleting needs create on it too
        self.authorizer
            .ensure_authorized(headers, &ResourceAction::poddefaults("create", namespace))
            .await?;

        self.backend.delete_secret(namespace, name).await?;
        tracing::info!(namespace = %namespace, secret = %name, "Deleted registry secret");

        self.reconcile_after_mutation(namespace, name).await?;

        Ok(format!(
            "Secret {} deleted and PodDefault updated in namespace {}",
            name, namespace
        ))
    }

    /// Recompute the PodDefault from the registry secrets currently present
    /// in `namespace` and upsert it.
    pub async fn reconcile_poddefault(&self, namespace: &str) -> Result<PodDefault, K8sError> {
        let names = self.backend.list_registry_secrets(namespace).await?;
        let poddefault = registry_poddefault(namespace, &names);

        self.backend.apply_poddefault(&poddefault).await?;
        tracing::debug!(namespace = %namespace, secrets = names.len(), "Upserted registry PodDefault");

        Ok(poddefault)
    }

    async fn reconcile_after_mutation(&self, namespace: &str, secret: &str) -> ServiceResult<()> {
        if let Err(e) = self.reconcile_poddefault(namespace).await {
            tracing::warn!(
                namespace = %namespace,
                secret = %secret,
                error = %e,
                "Secret change committed but PodDefault is stale"
            );
            return Err(e.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for RegistrySecretService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrySecretService")
            .field("authorizer", &self.authorizer)
            .finish()
    }
}
