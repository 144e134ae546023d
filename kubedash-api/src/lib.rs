//! kubedash API library
//!
//! Dashboard backend that manages registry credentials in Kubernetes
//! namespaces on behalf of the calling user.

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Application state
pub mod state;
pub use state::AppState;

// Identity & authorization
pub mod auth;

// Kubernetes integration
pub mod kubernetes;

// Registry credential orchestration
pub mod registry;

// HTTP surface
pub mod routes;

// Graceful shutdown handling
pub mod shutdown;
