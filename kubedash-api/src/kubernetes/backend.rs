//! Cluster operations behind a trait so the orchestrator can be exercised
//! without an API server.

use async_trait::async_trait;
use kubedash_common::RegistryCredential;

use super::client::K8sClient;
use super::error::K8sResult;
use super::poddefault::{self, PodDefault};
use super::secrets;

/// Secret and PodDefault operations used by the registry orchestrator
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Create the dockerconfigjson secret for a credential
    async fn create_registry_secret(&self, credential: &RegistryCredential) -> K8sResult<()>;

    /// Names of the dockerconfigjson secrets in a namespace
    async fn list_registry_secrets(&self, namespace: &str) -> K8sResult<Vec<String>>;

    async fn delete_secret(&self, namespace: &str, name: &str) -> K8sResult<()>;

    /// Create or replace a PodDefault
    async fn apply_poddefault(&self, poddefault: &PodDefault) -> K8sResult<()>;

    async fn list_poddefaults(&self, namespace: &str) -> K8sResult<Vec<PodDefault>>;
}

/// `RegistryBackend` backed by the Kubernetes API
#[derive(Debug, Clone)]
pub struct KubeRegistryBackend {
    client: K8sClient,
}

impl KubeRegistryBackend {
    pub fn new(client: K8sClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RegistryBackend for KubeRegistryBackend {
    async fn create_registry_secret(&self, credential: &RegistryCredential) -> K8sResult<()> {
        secrets::create_registry_secret(&self.client, credential).await
    }

    async fn list_registry_secrets(&self, namespace: &str) -> K8sResult<Vec<String>> {
        secrets::list_registry_secrets(&self.client, namespace).await
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> K8sResult<()> {
        secrets::delete_secret(&self.client, namespace, name).await
    }

    async fn apply_poddefault(&self, poddefault: &PodDefault) -> K8sResult<()> {
        poddefault::apply_poddefault(&self.client, poddefault).await
    }

    async fn list_poddefaults(&self, namespace: &str) -> K8sResult<Vec<PodDefault>> {
        poddefault::list_poddefaults(&self.client, namespace).await
    }
}
