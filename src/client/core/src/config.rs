//! Client configuration.

use serde::Deserialize;

use crate::error::Result;

/// Configuration for the AssetHub session client and navigation guard.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the remote API, including the version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path of the login screen.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Default landing path used for silent access-denied redirects.
    #[serde(default = "default_landing_path")]
    pub landing_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            login_path: default_login_path(),
            landing_path: default_landing_path(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_login_path() -> String {
    "/login".to_string()
}
fn default_landing_path() -> String {
    "/".to_string()
}

impl ClientConfig {
    /// Load configuration from the environment (prefix `ASSETHUB`).
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ASSETHUB").separator("__"))
            .build()?;

        let cfg: ClientConfig = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Create a configuration pointing at the given base URL, with defaults
    /// for everything else.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:8000/api/v1");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.login_path, "/login");
        assert_eq!(cfg.landing_path, "/");
    }

    #[test]
    fn test_with_base_url() {
        let cfg = ClientConfig::with_base_url("https://assets.example.com/api/v1");
        assert_eq!(cfg.base_url, "https://assets.example.com/api/v1");
        assert_eq!(cfg.login_path, "/login");
    }
}
