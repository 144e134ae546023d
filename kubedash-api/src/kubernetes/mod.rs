//! Kubernetes integration for kubedash
//!
//! - Client construction (kubeconfig / in-cluster)
//! - Registry (dockerconfigjson) secrets
//! - Kubeflow PodDefaults
//! - The `RegistryBackend` seam the orchestrator talks to

pub mod backend;
pub mod client;
pub mod error;
pub mod poddefault;
pub mod secrets;

pub use backend::{KubeRegistryBackend, RegistryBackend};
pub use client::{ClusterProbe, K8sClient};
pub use error::{K8sError, K8sResult};
pub use poddefault::PodDefault;

/// Field manager and `app.kubernetes.io/managed-by` value for objects
/// kubedash writes
pub const FIELD_MANAGER: &str = "kubedash";
