//! Kubernetes error types

use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Error from kube-rs client
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// Invalid kubeconfig
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Response from the API server was missing an expected field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Failed to encode a resource before sending it
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl K8sError {
    /// Message shown to API callers: the API server's own `message` when it
    /// returned a Status object, else the raw error text.
    pub fn api_message(&self) -> String {
        match self {
            K8sError::KubeError(kube::Error::Api(status)) if !status.message.is_empty() => {
                status.message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for K8sError {
    fn from(err: serde_json::Error) -> Self {
        K8sError::Encoding(err.to_string())
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;
