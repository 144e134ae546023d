//! Kubeflow PodDefault resource
//!
//! A PodDefault injects configuration into pods whose labels match its
//! selector. kubedash maintains one per namespace listing every registry
//! secret as an image pull secret.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::client::K8sClient;
use super::error::{K8sError, K8sResult};

/// Name of the PodDefault kubedash owns in each namespace
pub const REGISTRY_PODDEFAULT_NAME: &str = "registry-credentials";

/// Pod label that opts a pod into the registry PodDefault
pub const REGISTRY_PODDEFAULT_LABEL: &str = "registry-credentials";

const REGISTRY_PODDEFAULT_DESC: &str = "Mount registry credentials";

/// Only the fields kubedash reads or writes are typed. Everything else in
/// the spec (`env`, `volumes`, `volumeMounts`, ...) is carried in `extra` so
/// listed objects are returned intact.
///
/// The CRD itself is installed by Kubeflow, so no schema is generated here.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[kube(
    group = "kubeflow.org",
    version = "v1alpha1",
    kind = "PodDefault",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct PodDefaultSpec {
    /// Pods matching this selector receive the defaults
    #[serde(default)]
    pub selector: LabelSelector,

    /// Description shown in the notebook spawner form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// `Some(vec![])` is sent as `[]`, which clears the list on apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_secrets: Option<Vec<SecretReference>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `{name: ...}` reference to a secret in the same namespace
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SecretReference {
    pub name: String,
}

/// Desired state of the registry PodDefault for `namespace`, derived
/// entirely from the names of the registry secrets currently present.
pub fn registry_poddefault(namespace: &str, secret_names: &[String]) -> PodDefault {
    let mut names: Vec<&String> = secret_names.iter().collect();
    names.sort();
    names.dedup();

    let mut match_labels = BTreeMap::new();
    match_labels.insert(REGISTRY_PODDEFAULT_LABEL.to_string(), "true".to_string());

    let mut labels = BTreeMap::new();
    labels.insert(
        "app.kubernetes.io/managed-by".to_string(),
        super::FIELD_MANAGER.to_string(),
    );

    PodDefault {
        metadata: ObjectMeta {
            name: Some(REGISTRY_PODDEFAULT_NAME.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: PodDefaultSpec {
            selector: LabelSelector {
                match_labels: Some(match_labels),
                match_expressions: None,
            },
            desc: Some(REGISTRY_PODDEFAULT_DESC.to_string()),
            image_pull_secrets: Some(
                names
                    .into_iter()
                    .map(|name| SecretReference { name: name.clone() })
                    .collect(),
            ),
            extra: serde_json::Map::new(),
        },
    }
}

impl PodDefault {
    /// Names of the secrets referenced as image pull secrets
    pub fn pull_secret_names(&self) -> Vec<String> {
        self.spec
            .image_pull_secrets
            .iter()
            .flatten()
            .map(|r| r.name.clone())
            .collect()
    }

    /// Label the spawner form uses to opt a notebook into this PodDefault:
    /// the first `matchLabels` key, else the first `matchExpressions` key.
    pub fn form_label(&self) -> String {
        let selector = &self.spec.selector;
        if let Some(key) = selector.match_labels.as_ref().and_then(|m| m.keys().next()) {
            return key.clone();
        }
        selector
            .match_expressions
            .as_ref()
            .and_then(|exprs| exprs.first())
            .map(|expr| expr.key.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Description for the spawner form, falling back to the object name
    pub fn form_desc(&self) -> String {
        self.spec
            .desc
            .clone()
            .or_else(|| self.metadata.name.clone())
            .unwrap_or_default()
    }
}

/// Create or replace a PodDefault with server-side apply.
///
/// Forced apply: the last writer wins, concurrent reconciliations of the
/// same namespace are not detected.
pub async fn apply_poddefault(client: &K8sClient, poddefault: &PodDefault) -> K8sResult<()> {
    let namespace = poddefault
        .metadata
        .namespace
        .as_deref()
        .ok_or_else(|| K8sError::Internal("PodDefault has no namespace".to_string()))?;
    let name = poddefault
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| K8sError::Internal("PodDefault has no name".to_string()))?;

    let api: Api<PodDefault> = Api::namespaced(client.inner().clone(), namespace);
    api.patch(
        name,
        &PatchParams::apply(super::FIELD_MANAGER).force(),
        &Patch::Apply(poddefault),
    )
    .await?;

    Ok(())
}

/// List PodDefaults in a namespace
pub async fn list_poddefaults(client: &K8sClient, namespace: &str) -> K8sResult<Vec<PodDefault>> {
    let api: Api<PodDefault> = Api::namespaced(client.inner().clone(), namespace);
    let list = api.list(&ListParams::default()).await?;

    Ok(list.items)
}
