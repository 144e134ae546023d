//! Common types shared between kubedash-api and its clients

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kubernetes core API group (secrets, pods, ...)
pub const CORE_GROUP: &str = "";

/// Group/version of the Kubeflow PodDefault resource
pub const KUBEFLOW_GROUP: &str = "kubeflow.org";
pub const PODDEFAULT_VERSION: &str = "v1alpha1";

/// A verb on a Kubernetes resource, optionally scoped to a namespace.
///
/// This is the resource half of an access request; the user is attached by
/// the authorization gate when it builds the SubjectAccessReview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAction {
    pub verb: String,
    pub group: String,
    pub version: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subresource: Option<String>,
}

impl ResourceAction {
    pub fn new(
        verb: impl Into<String>,
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            verb: verb.into(),
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
            namespace: None,
            subresource: None,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_subresource(mut self, subresource: impl Into<String>) -> Self {
        self.subresource = Some(subresource.into());
        self
    }

    /// `<verb>` on core v1 secrets
    pub fn secrets(verb: &str, namespace: &str) -> Self {
        Self::new(verb, CORE_GROUP, "v1", "secrets").in_namespace(namespace)
    }

    /// `<verb>` on kubeflow.org/v1alpha1 poddefaults
    pub fn poddefaults(verb: &str, namespace: &str) -> Self {
        Self::new(verb, KUBEFLOW_GROUP, PODDEFAULT_VERSION, "poddefaults").in_namespace(namespace)
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}/{}", self.verb, self.group, self.version, self.resource)?;
        if let Some(sub) = &self.subresource {
            write!(f, "/{}", sub)?;
        }
        if let Some(ns) = &self.namespace {
            write!(f, " in namespace '{}'", ns)?;
        }
        Ok(())
    }
}

/// Body of `POST /api/secrets/create`.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error instead of a deserialization failure.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RegistryCredentialRequest {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl RegistryCredentialRequest {
    /// Presence check only: every field must be set and non-empty.
    pub fn validate(self) -> Result<RegistryCredential> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }

        match (
            present(self.namespace),
            present(self.name),
            present(self.registry),
            present(self.username),
            present(self.password),
            present(self.email),
        ) {
            (
                Some(namespace),
                Some(name),
                Some(registry),
                Some(username),
                Some(password),
                Some(email),
            ) => Ok(RegistryCredential {
                namespace,
                name,
                registry,
                username,
                password,
                email,
            }),
            _ => Err(Error::MissingFields),
        }
    }
}

impl fmt::Debug for RegistryCredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentialRequest")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .finish()
    }
}

/// A validated registry credential
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredential {
    pub namespace: String,
    pub name: String,
    pub registry: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl fmt::Debug for RegistryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredential")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// `{ "message": ... }` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors shared across crates
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required fields")]
    MissingFields,
}

pub type Result<T> = std::result::Result<T, Error>;
