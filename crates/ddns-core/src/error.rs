//! Error types for the DDNS updater
//!
//! A single error enum covers all three stages of a run. Which stage an error
//! came from (configuration, discovery, submission) is decided by the caller
//! that produced it, see [`crate::engine::FamilyOutcome`].

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials could not be loaded
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Public address discovery failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// An operation exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Socket-level errors
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors (dispatch, connect, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Hosted zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider explicitly rejected the change
    #[error("Change rejected: {0}")]
    Rejected(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a credential error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a rejection error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True for errors that must stop the run before any network activity
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Credentials(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::config("x").is_configuration());
        assert!(Error::credentials("x").is_configuration());
        assert!(!Error::discovery("x").is_configuration());
        assert!(!Error::rejected("x").is_configuration());
    }

    #[test]
    fn test_provider_error_display() {
        let err = Error::provider("route53", "boom");
        assert_eq!(err.to_string(), "Provider error (route53): boom");
    }
}
