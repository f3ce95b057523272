//! Error handling for the AssetHub client core.
//!
//! This module provides:
//! - A single error type covering authentication, authorization, transport,
//!   and persisted-state failures
//! - `From` conversions for the transport and serialization crates
//! - A `Result` alias used throughout the crate

use thiserror::Error;

/// A specialized Result type for AssetHub client operations.
pub type Result<T> = std::result::Result<T, AssetHubError>;

/// The main error type for the AssetHub client core.
#[derive(Debug, Error)]
pub enum AssetHubError {
    /// The remote API rejected the session credential. The session client
    /// handles this by forcing a logout and a single redirect to the login
    /// path; it is surfaced to callers so in-flight work can stop.
    #[error("Authentication rejected by the remote API")]
    AuthenticationRejected,

    /// A resolved capability requirement was not satisfied. The navigation
    /// guard answers with a silent redirect instead; this variant exists for
    /// callers that want an error rather than a decision.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The persisted capability list exists but could not be parsed.
    #[error("Stored permission list is malformed: {0}")]
    MalformedPermissions(String),

    /// The remote API answered with a non-success, non-authentication status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON encode/decode failure outside the permission-list path.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration could not be assembled.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AssetHubError {
    /// Whether this error is the authentication-rejected signal that forces
    /// a logout.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthenticationRejected)
    }

    /// Create a permission-denied error for an unsatisfied requirement.
    pub fn permission_denied(requirement: impl Into<String>) -> Self {
        Self::PermissionDenied(requirement.into())
    }
}

impl From<config::ConfigError> for AssetHubError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejected_classification() {
        assert!(AssetHubError::AuthenticationRejected.is_auth_rejected());
        assert!(!AssetHubError::permission_denied("assets:update").is_auth_rejected());
    }

    #[test]
    fn test_api_error_display() {
        let error = AssetHubError::Api {
            status: 503,
            message: "maintenance window".to_string(),
        };
        assert_eq!(format!("{}", error), "API error (503): maintenance window");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let parse_error = serde_json::from_str::<Vec<String>>("not-json").unwrap_err();
        let error: AssetHubError = parse_error.into();
        assert!(matches!(error, AssetHubError::Serialization(_)));
    }
}
