// # AWS Default Credential Chain
//
// CredentialSource backed by the AWS SDK default provider chain: environment,
// shared profile files, web identity, ECS and EC2 instance roles.

use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_route53::config::{BehaviorVersion, Region};
use ddns_core::traits::{CredentialSource, Credentials};
use ddns_core::{Error, Result};

use crate::ROUTE53_REGION;

/// Credentials resolved through the AWS default chain, once per run
#[derive(Debug, Clone, Default)]
pub struct AwsDefaultChain {
    /// Named profile to prefer over `AWS_PROFILE`
    profile: Option<String>,
}

impl AwsDefaultChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve from a specific shared-config profile
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
        }
    }
}

#[async_trait]
impl CredentialSource for AwsDefaultChain {
    async fn load(&self) -> Result<Credentials> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(ROUTE53_REGION));
        if let Some(ref profile) = self.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| Error::credentials("No AWS credential provider is configured"))?;

        let resolved = provider
            .provide_credentials()
            .await
            .map_err(|e| Error::credentials(format!("AWS default chain found no credentials: {}", e)))?;

        tracing::debug!("Resolved AWS credentials for key {}", resolved.access_key_id());

        let mut credentials =
            Credentials::new(resolved.access_key_id(), resolved.secret_access_key());
        if let Some(token) = resolved.session_token() {
            credentials = credentials.with_session_token(token);
        }
        Ok(credentials)
    }

    fn source_name(&self) -> &'static str {
        "aws-default-chain"
    }
}
