//! Connection configuration for the Strato control plane.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API URL not set, expecting \"http://<server>:<port>\"")]
    ApiUrlRequired,

    #[error("Namespace not set")]
    NamespaceRequired,

    #[error("Access key not set")]
    KeyRequired,
}

/// Connection parameters for the Strato control plane.
///
/// Every field is required. [`Config::validate`] rejects empty values so a
/// client is never constructed half-configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the control plane API, e.g. `http://cloud.example.com:13000`.
    pub api_url: String,
    /// Namespace to authenticate against.
    pub namespace: String,
    /// Access key for the namespace.
    pub key: String,
}

impl Config {
    /// Build a config from explicit values.
    pub fn new(
        api_url: impl Into<String>,
        namespace: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// Read connection parameters from `STRATO_API_URL`, `STRATO_NAMESPACE`
    /// and `STRATO_KEY`, then validate them.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            api_url: std::env::var("STRATO_API_URL").unwrap_or_default(),
            namespace: std::env::var("STRATO_NAMESPACE").unwrap_or_default(),
            key: std::env::var("STRATO_KEY").unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every connection parameter is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::ApiUrlRequired);
        }
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::NamespaceRequired);
        }
        if self.key.trim().is_empty() {
            return Err(ConfigError::KeyRequired);
        }
        Ok(())
    }
}
