//! Caller identity and Kubernetes-delegated authorization
//!
//! - `authn`: derives the caller identity from the trusted upstream header
//! - `authz`: asks the API server (SubjectAccessReview) whether the caller
//!   may perform an action

pub mod authn;
pub mod authz;

pub use authn::user_identity;
pub use authz::{AccessReviewer, AuthzError, Authorizer, KubeAccessReviewer};
