//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with the API server address and helper methods.

use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use super::error::{K8sError, K8sResult};
use crate::config::KubernetesConfig;

/// Wrapper around kube-rs Client
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
}

impl K8sClient {
    /// Build a client from settings: an explicit kubeconfig file when
    /// configured, otherwise inferred (in-cluster, then `~/.kube/config`).
    pub async fn from_settings(settings: &KubernetesConfig) -> K8sResult<Self> {
        let options = KubeConfigOptions {
            context: settings.context.clone(),
            ..Default::default()
        };

        let config = match &settings.kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    K8sError::InvalidKubeconfig(format!(
                        "Failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e))
                    })?
            }
            None if settings.context.is_some() => Config::from_kubeconfig(&options)
                .await
                .map_err(|e| {
                    K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e))
                })?,
            None => Config::infer().await.map_err(|e| {
                K8sError::InvalidKubeconfig(format!("Failed to infer config: {}", e))
            })?,
        };

        Self::from_config(config)
    }

    fn from_config(config: Config) -> K8sResult<Self> {
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            api_server,
        })
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }
}

/// Reachability check used by the readiness endpoint
#[async_trait]
pub trait ClusterProbe: Send + Sync {
    /// Version reported by the API server
    async fn server_version(&self) -> K8sResult<String>;
}

#[async_trait]
impl ClusterProbe for K8sClient {
    async fn server_version(&self) -> K8sResult<String> {
        let version = self.inner.apiserver_version().await?;
        Ok(version.git_version)
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}
