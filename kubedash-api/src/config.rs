//! Configuration management for kubedash
//!
//! Settings are loaded once at startup from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)
//!
//! The result is immutable and shared through `Arc`s.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Identity header and authorization bypass
    pub auth: AuthConfig,
    /// Kubernetes client selection
    pub kubernetes: KubernetesConfig,
    /// Logging outputs
    pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Identity and authorization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Skip every SubjectAccessReview (local/dev deployments only)
    pub disable_auth: bool,
    /// Header injected by the upstream auth proxy carrying the user id
    pub userid_header: String,
    /// Prefix stripped from the header value
    pub userid_prefix: String,
}

/// Kubernetes client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Explicit kubeconfig file; when unset the client is inferred
    /// (in-cluster service account first, then the default kubeconfig)
    pub kubeconfig: Option<PathBuf>,
    /// Context to use from the kubeconfig
    pub context: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON on the console
    pub json: bool,
    /// Directory for rolling log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            disable_auth: false,
            userid_header: "kubeflow-userid".to_string(),
            userid_prefix: ":".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("KUBEDASH_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/kubedash/config.toml")),
            Some(PathBuf::from("./kubedash.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("KUBEDASH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("KUBEDASH_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Auth
        if let Some(disable) = lookup("APP_DISABLE_AUTH") {
            self.auth.disable_auth = disable.eq_ignore_ascii_case("true");
        }
        if let Some(header) = lookup("USERID_HEADER") {
            self.auth.userid_header = header;
        }
        if let Some(prefix) = lookup("USERID_PREFIX") {
            self.auth.userid_prefix = prefix;
        }

        // Kubernetes
        if let Some(path) = lookup("KUBECONFIG_PATH") {
            self.kubernetes.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(context) = lookup("KUBE_CONTEXT") {
            self.kubernetes.context = Some(context);
        }

        // Logging
        if let Some(level) = lookup("KUBEDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("KUBEDASH_LOG_JSON") {
            self.logging.json = json.eq_ignore_ascii_case("true");
        }
        if let Some(dir) = lookup("KUBEDASH_LOG_DIR") {
            self.logging.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.auth.userid_header.trim().is_empty() {
            return Err(ConfigError::Validation(
                "User id header name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Config validation failed: {0}")]
    Validation(String),
}
