//! Registry (dockerconfigjson) secrets
//!
//! Secret values never leave this module: listing only returns names.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kubedash_common::RegistryCredential;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::client::K8sClient;
use super::error::K8sResult;

/// Secret type consumed by the kubelet for image pulls
pub const DOCKER_CONFIG_JSON_TYPE: &str = "kubernetes.io/dockerconfigjson";

/// Data key holding the Docker config blob
pub const DOCKER_CONFIG_JSON_KEY: &str = ".dockerconfigjson";

/// `~/.docker/config.json` layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    pub auths: BTreeMap<String, DockerAuth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerAuth {
    pub username: String,
    pub password: String,
    pub email: String,
    /// base64("username:password")
    pub auth: String,
}

impl DockerConfig {
    pub fn for_credential(credential: &RegistryCredential) -> Self {
        let auth = BASE64.encode(format!("{}:{}", credential.username, credential.password));

        let mut auths = BTreeMap::new();
        auths.insert(
            credential.registry.clone(),
            DockerAuth {
                username: credential.username.clone(),
                password: credential.password.clone(),
                email: credential.email.clone(),
                auth,
            },
        );

        Self { auths }
    }
}

/// Build the Secret object for a credential. The API server transports
/// `data` base64 encoded, so the JSON blob is stored as raw bytes here.
pub fn registry_secret(credential: &RegistryCredential) -> K8sResult<Secret> {
    let blob = serde_json::to_vec(&DockerConfig::for_credential(credential))?;

    let mut data = BTreeMap::new();
    data.insert(DOCKER_CONFIG_JSON_KEY.to_string(), ByteString(blob));

    let mut labels = BTreeMap::new();
    labels.insert(
        "app.kubernetes.io/managed-by".to_string(),
        super::FIELD_MANAGER.to_string(),
    );

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(credential.name.clone()),
            namespace: Some(credential.namespace.clone()),
            labels: Some(labels),
            ..Default::default()
        },
        type_: Some(DOCKER_CONFIG_JSON_TYPE.to_string()),
        data: Some(data),
        ..Default::default()
    })
}

pub fn is_registry_secret(secret: &Secret) -> bool {
    secret.type_.as_deref() == Some(DOCKER_CONFIG_JSON_TYPE)
}

/// Create a dockerconfigjson Secret
pub async fn create_registry_secret(
    client: &K8sClient,
    credential: &RegistryCredential,
) -> K8sResult<()> {
    let secrets: Api<Secret> = Api::namespaced(client.inner().clone(), &credential.namespace);
    let secret = registry_secret(credential)?;

    secrets.create(&PostParams::default(), &secret).await?;

    Ok(())
}

/// Names of every dockerconfigjson Secret in a namespace
pub async fn list_registry_secrets(client: &K8sClient, namespace: &str) -> K8sResult<Vec<String>> {
    let secrets: Api<Secret> = Api::namespaced(client.inner().clone(), namespace);
    let params = ListParams::default().fields(&format!("type={}", DOCKER_CONFIG_JSON_TYPE));
    let list = secrets.list(&params).await?;

    Ok(list
        .items
        .into_iter()
        .filter(is_registry_secret)
        .filter_map(|s| s.metadata.name)
        .collect())
}

/// Delete a Secret
pub async fn delete_secret(client: &K8sClient, namespace: &str, name: &str) -> K8sResult<()> {
    let secrets: Api<Secret> = Api::namespaced(client.inner().clone(), namespace);
    secrets.delete(name, &DeleteParams::default()).await?;

    Ok(())
}
