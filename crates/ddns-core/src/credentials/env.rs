//! Credentials from the standard AWS environment variables

use async_trait::async_trait;
use std::env;

use crate::Error;
use crate::traits::credential_source::{CredentialSource, Credentials};

pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and, if set,
/// `AWS_SESSION_TOKEN` at load time
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    access_key_var: String,
    secret_key_var: String,
    session_token_var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::with_vars(ACCESS_KEY_VAR, SECRET_KEY_VAR, SESSION_TOKEN_VAR)
    }
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from differently named variables
    pub fn with_vars(
        access_key_var: impl Into<String>,
        secret_key_var: impl Into<String>,
        session_token_var: impl Into<String>,
    ) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
            session_token_var: session_token_var.into(),
        }
    }

    /// Build credentials from `lookup`, which maps a variable name to its value
    fn resolve<F>(&self, lookup: F) -> Result<Credentials, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| match lookup(name) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(Error::credentials(format!("{} is empty", name))),
            None => Err(Error::credentials(format!("{} is not set", name))),
        };

        let mut credentials = Credentials::new(
            required(&self.access_key_var)?,
            required(&self.secret_key_var)?,
        );

        if let Some(token) = lookup(&self.session_token_var)
            && !token.is_empty()
        {
            credentials = credentials.with_session_token(token);
        }

        Ok(credentials)
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    async fn load(&self) -> Result<Credentials, Error> {
        self.resolve(|name| env::var(name).ok())
    }

    fn source_name(&self) -> &'static str {
        "env"
    }
}
