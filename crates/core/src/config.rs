use crate::error::{BridgeError, BridgeResult};
use crate::registry::{default_endpoints, EndpointRegistry, DEFAULT_FEDERATED_URL};
use crate::types::EndpointDescriptor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default per-call deadline for remote queries.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_federated_url")]
    pub federated_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Empty means "use the built-in endpoint list".
    #[serde(default)]
    pub endpoints: Vec<EndpointDescriptor>,
}

fn default_federated_url() -> String {
    DEFAULT_FEDERATED_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("kgbridge/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            federated_url: default_federated_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            endpoints: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file. A missing file yields defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(config_path: &Path) -> BridgeResult<Self> {
        if !config_path.exists() {
            tracing::debug!(
                path = %config_path.display(),
                "Configuration file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            BridgeError::Config(format!(
                "failed to read {}: {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> BridgeResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| BridgeError::Config(format!("failed to parse configuration: {}", e)))?;
        if config.timeout_ms == 0 {
            return Err(BridgeError::Config("timeout_ms must be greater than zero".into()));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the registry this configuration describes.
    pub fn registry(&self) -> BridgeResult<EndpointRegistry> {
        let endpoints = if self.endpoints.is_empty() {
            default_endpoints()
        } else {
            self.endpoints.clone()
        };
        EndpointRegistry::new(endpoints, self.federated_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.federated_url, DEFAULT_FEDERATED_URL);
        assert!(config.user_agent.starts_with("kgbridge/"));

        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), default_endpoints().len());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_load_custom_endpoints() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
federated_url = "http://localhost:7001/sparql"
timeout_ms = 5000

[[endpoints]]
id = "local-graph"
url = "http://localhost:7200/sparql"
domain = "Testing"
description = "Local triple store"
"#
        )
        .unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));

        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.federated_url(), "http://localhost:7001/sparql");
        assert_eq!(
            registry.get("local-graph").unwrap().url,
            "http://localhost:7200/sparql"
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = BridgeConfig::from_toml("timeout_ms = 0").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(BridgeConfig::from_toml("timeout_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_invalid_identifier_fails_registry_build() {
        let config = BridgeConfig::from_toml(
            r#"
[[endpoints]]
id = "bad_id"
url = "http://localhost/sparql"
domain = "Testing"
description = "Broken"
"#,
        )
        .unwrap();
        assert!(config.registry().is_err());
    }
}
