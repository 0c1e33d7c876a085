// # Credential Source Trait
//
// Defines how provider credentials are acquired. Credential acquisition is
// kept out of the reconciliation core: the provider is constructed once per
// run from whatever a `CredentialSource` returns.
//
// ## Implementations
//
// - Static / debug placeholder: `ddns_core::credentials::StaticCredentials`
// - Secret files: `ddns_core::credentials::FileCredentials`
// - Environment variables: `ddns_core::credentials::EnvCredentials`
// - AWS default chain (profile, instance role): `ddns-provider-route53` crate

use async_trait::async_trait;
use std::fmt;

/// An access-key/secret-key credential pair
///
/// # Security
///
/// The Debug implementation does NOT expose the secret or the session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key identifier
    pub access_key: String,
    /// Secret access key
    /// ⚠️ NEVER log this value
    pub secret_key: String,
    /// Session token, only for temporary credentials from a chain provider
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create a long-lived key pair (no session token)
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

// Custom Debug implementation that hides the secret
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<REDACTED>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

/// Trait for credential acquisition
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Load credentials
    ///
    /// # Returns
    ///
    /// - `Ok(Credentials)`: Credentials ready for the provider
    /// - `Err(Error::Credentials)`: Source unavailable or unreadable
    async fn load(&self) -> Result<Credentials, crate::Error>;

    /// Name of the source (for logging)
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_exposed_in_debug() {
        let creds = Credentials::new("AKIAEXAMPLE", "super_secret_value")
            .with_session_token("session_token_value");

        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("AKIAEXAMPLE"));
        assert!(!debug_str.contains("super_secret_value"));
        assert!(!debug_str.contains("session_token_value"));
    }
}
