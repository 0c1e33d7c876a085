// # Route 53 DNS Provider
//
// This crate provides the AWS Route 53 provider for the DDNS updater.
//
// ## Behavior
//
// - One `ChangeResourceRecordSets` call per submission, action `UPSERT`
// - Weighted record set (weight 1, set identifier from the request)
// - SDK retries disabled; the caller decides whether a failure is final
// - Operation timeout equal to the submission timeout
// - Dry-run mode logs the request and never calls the API
//
// ## Security Requirements
//
// - Secret key and session token NEVER appear in logs or Debug output
// - Credentials are taken from a `CredentialSource`, never read here
//
// ## API Reference
//
// - ChangeResourceRecordSets: POST `/2013-04-01/hostedzone/{Id}/rrset/`
// - Route 53 is a global service signed against `us-east-1`

mod chain;

pub use chain::AwsDefaultChain;

use async_trait::async_trait;
use aws_sdk_route53::config::retry::RetryConfig;
use aws_sdk_route53::config::timeout::TimeoutConfig;
use aws_sdk_route53::config::{BehaviorVersion, Region};
use aws_sdk_route53::error::{BuildError, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use ddns_core::traits::{ChangeReceipt, Credentials, DnsProvider, RecordChangeRequest};
use ddns_core::{Error, Result};
use std::time::Duration;

/// Region every Route 53 request is signed for
pub const ROUTE53_REGION: &str = "us-east-1";

/// Default operation timeout (30 seconds)
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Error codes returned when the request signature or key is rejected
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "ExpiredToken",
    "IncompleteSignature",
    "InvalidClientTokenId",
    "InvalidSignatureException",
    "MissingAuthenticationToken",
    "SignatureDoesNotMatch",
    "UnrecognizedClientException",
];

/// Client settings for a run
#[derive(Debug, Clone)]
pub struct Route53Options {
    /// Bound on a single API call
    pub submission_timeout: Duration,

    /// Alternate endpoint (e.g. a local mock); `None` uses the AWS endpoint
    pub endpoint_url: Option<String>,

    /// If true, log the request instead of sending it
    pub dry_run: bool,
}

impl Default for Route53Options {
    fn default() -> Self {
        Self {
            submission_timeout: DEFAULT_OPERATION_TIMEOUT,
            endpoint_url: None,
            dry_run: false,
        }
    }
}

impl Route53Options {
    /// Set the operation timeout
    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = timeout;
        self
    }

    /// Send requests to `url` instead of the AWS endpoint
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// True when `DDNS_MODE=dry-run` is set in the environment
pub fn dry_run_from_env() -> bool {
    dry_run_from(std::env::var("DDNS_MODE").ok().as_deref())
}

/// True when a `DDNS_MODE` value selects dry-run (case-insensitive)
pub fn dry_run_from(mode: Option<&str>) -> bool {
    mode.is_some_and(|mode| mode.trim().eq_ignore_ascii_case("dry-run"))
}

/// Route 53 DNS provider
///
/// Stateless and single-shot: every `upsert` is one API call with no retry.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider logs the JSON form of the change it
/// would submit and returns a receipt with `dry_run = true`.
///
/// # Security
///
/// The Debug implementation does NOT expose credentials.
pub struct Route53Provider {
    /// SDK client holding the static credentials
    client: aws_sdk_route53::Client,

    /// Settings the client was built with
    options: Route53Options,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("credentials", &"<REDACTED>")
            .field("region", &ROUTE53_REGION)
            .field("options", &self.options)
            .finish()
    }
}

impl Route53Provider {
    /// Create a Route 53 provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: Key pair (and optional session token) used to sign requests
    /// - `options`: Timeout, endpoint override and dry-run flag
    ///
    /// No network activity happens here.
    pub fn new(credentials: Credentials, options: Route53Options) -> Self {
        let sdk_credentials = aws_sdk_route53::config::Credentials::new(
            credentials.access_key,
            credentials.secret_key,
            credentials.session_token,
            None,
            "ddns-update",
        );

        let mut builder = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(ROUTE53_REGION))
            .credentials_provider(sdk_credentials)
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(options.submission_timeout)
                    .build(),
            );

        if let Some(ref url) = options.endpoint_url {
            tracing::debug!("Using Route 53 endpoint override {}", url);
            builder = builder.endpoint_url(url);
        }

        if options.dry_run {
            tracing::warn!("Route 53 provider running in DRY-RUN mode - no changes will be made");
        }

        Self {
            client: aws_sdk_route53::Client::from_conf(builder.build()),
            options,
        }
    }

    /// True when requests are logged instead of sent
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }
}

/// Build the single-change batch for `request`
fn change_batch(request: &RecordChangeRequest) -> std::result::Result<ChangeBatch, BuildError> {
    let record_set = ResourceRecordSet::builder()
        .name(&request.record_name)
        .r#type(RrType::from(request.record_type.as_str()))
        .ttl(request.ttl_seconds)
        .weight(request.weight)
        .set_identifier(&request.set_identifier)
        .resource_records(
            ResourceRecord::builder()
                .value(&request.record_value)
                .build()?,
        )
        .build()?;

    ChangeBatch::builder()
        .comment(&request.comment)
        .changes(
            Change::builder()
                .action(ChangeAction::Upsert)
                .resource_record_set(record_set)
                .build()?,
        )
        .build()
}

/// Map an SDK failure onto the crate error taxonomy
fn map_sdk_error<E, R>(err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::TimeoutError(_) => Error::timeout("Route 53 request timed out"),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            Error::timeout("Route 53 request timed out while connecting")
        }
        SdkError::DispatchFailure(failure) => {
            Error::http(format!("Route 53 request could not be sent: {:?}", failure))
        }
        SdkError::ConstructionFailure(_) => {
            Error::invalid_input(format!("Route 53 request could not be built: {}", err))
        }
        _ => classify_service_error(err.code(), err.message().unwrap_or("no message")),
    }
}

/// Map a service error code onto the crate error taxonomy
fn classify_service_error(code: Option<&str>, message: &str) -> Error {
    match code {
        Some(code) if AUTH_ERROR_CODES.contains(&code) => {
            Error::auth(format!("Route 53 rejected the credentials: {}: {}", code, message))
        }
        Some("NoSuchHostedZone") => Error::not_found(format!("Hosted zone not found: {}", message)),
        Some(code @ ("InvalidChangeBatch" | "InvalidInput")) => {
            Error::rejected(format!("{}: {}", code, message))
        }
        Some(code) => Error::provider("route53", format!("{}: {}", code, message)),
        None => Error::provider("route53", message.to_string()),
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    /// Upsert one weighted record set
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeReceipt)`: Change id and status reported by Route 53
    /// - `Err(Error)`: Classified failure; never retried here
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /2013-04-01/hostedzone/{HostedZoneId}/rrset/
    /// <ChangeResourceRecordSetsRequest>
    ///   <ChangeBatch><Changes><Change><Action>UPSERT</Action>...</Change></Changes></ChangeBatch>
    /// </ChangeResourceRecordSetsRequest>
    /// ```
    async fn upsert(&self, request: &RecordChangeRequest) -> Result<ChangeReceipt> {
        tracing::info!(
            "Upserting Route 53 record: {} {} -> {} in zone {} [mode: {}]",
            request.record_type,
            request.record_name,
            request.record_value,
            request.hosted_zone_id,
            if self.options.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.options.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send ChangeResourceRecordSets: {}",
                serde_json::to_string(request)?
            );
            return Ok(ChangeReceipt::dry_run());
        }

        let batch = change_batch(request)
            .map_err(|e| Error::invalid_input(format!("Invalid change batch: {}", e)))?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&request.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let info = output
            .change_info()
            .ok_or_else(|| Error::provider("route53", "Response carried no ChangeInfo"))?;

        let submitted = info.submitted_at();
        let receipt = ChangeReceipt {
            change_id: info.id().to_string(),
            status: info.status().as_str().to_string(),
            submitted_at: chrono::DateTime::from_timestamp(
                submitted.secs(),
                submitted.subsec_nanos(),
            ),
            dry_run: false,
        };

        tracing::debug!("Route 53 accepted change {} ({})", receipt.change_id, receipt.status);
        Ok(receipt)
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}
