//! In-memory credentials, including the debug-mode placeholder

use async_trait::async_trait;

use crate::Error;
use crate::traits::credential_source::{CredentialSource, Credentials};

/// Value returned for both key and secret in debug mode
pub const PLACEHOLDER_SECRET: &str = "test";

/// Credentials held in memory
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
    placeholder: bool,
}

impl StaticCredentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key, secret_key),
            placeholder: false,
        }
    }

    /// Fixed `"test"` / `"test"` pair for exercising the pipeline without secrets
    pub fn placeholder() -> Self {
        Self {
            credentials: Credentials::new(PLACEHOLDER_SECRET, PLACEHOLDER_SECRET),
            placeholder: true,
        }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn load(&self) -> Result<Credentials, Error> {
        Ok(self.credentials.clone())
    }

    fn source_name(&self) -> &'static str {
        if self.placeholder { "placeholder" } else { "static" }
    }
}
