// # ddns-update - Single-pass DDNS updater
//
// Discovers this host's public IPv4 and/or IPv6 address and upserts the
// matching A/AAAA records in a Route 53 hosted zone, then exits. Scheduling
// (cron, systemd timers) is left to the caller.
//
// This binary is a THIN integration layer: it parses flags, picks the
// credential source and discoverer, and hands everything to `DdnsEngine`.
//
// ## Configuration
//
// Every flag can also be set through the environment:
//
// - `--ipv4` / `DDNS_IPV4`, `--ipv6` / `DDNS_IPV6`: families to update
// - `--route53.hostedzone` / `DDNS_ROUTE53_HOSTEDZONE`: hosted zone id
// - `--route53.A.name` / `DDNS_ROUTE53_A_NAME`: A record name
// - `--route53.AAAA.name` / `DDNS_ROUTE53_AAAA_NAME`: AAAA record name
// - `--aws.accessKeyID`, `--aws.SecretAccessKey`: files holding the key pair
// - `--credentials env|chain`: source used when no key files are given
// - `--aws.profile`: shared-config profile for the `chain` source
// - `--debug`: use the placeholder key pair and read no secret files
// - `--discovery dns|http`, `--discovery.url`: address discovery strategy
// - `--timeout`, `--submit-timeout`: per-call bounds in seconds
// - `--dry-run` (or `DDNS_MODE=dry-run`): log changes instead of submitting
// - `--log-level` / `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// ddns-update --ipv4 --ipv6 \
//     --aws.accessKeyID /run/secrets/aws_key_id \
//     --aws.SecretAccessKey /run/secrets/aws_secret \
//     --route53.hostedzone Z0123456789ABC \
//     --route53.A.name home.example.com \
//     --route53.AAAA.name home6.example.com
// ```

use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use ddns_core::credentials::{EnvCredentials, FileCredentials, StaticCredentials};
use ddns_core::traits::{AddressDiscoverer, CredentialSource};
use ddns_core::{DdnsEngine, FamilyStatus, ReconcileReport, RecordReconciler, RunConfig};
use ddns_ip_dns::DnsEchoDiscoverer;
use ddns_provider_route53::{AwsDefaultChain, Route53Options, Route53Provider};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible outcomes of a run
///
/// - 0: Every enabled family was updated or skipped
/// - 1: Configuration or credential error, nothing was sent
/// - 2: A submission failed, or the runtime could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Address discovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Discovery {
    /// TXT query to an echo nameserver
    Dns,
    /// Plain-text HTTP echo service
    Http,
}

/// Credential source used when no key files are given
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CredentialKind {
    /// AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY
    Env,
    /// AWS SDK default chain (environment, profile, instance role)
    Chain,
}

#[derive(Debug, Parser)]
#[command(
    name = "ddns-update",
    version,
    about = "Update Route 53 A/AAAA records with this host's public address"
)]
struct Args {
    /// Enable IPv4 lookup
    #[arg(long, env = "DDNS_IPV4")]
    ipv4: bool,

    /// Enable IPv6 lookup
    #[arg(long, env = "DDNS_IPV6")]
    ipv6: bool,

    /// Enable debug mode (placeholder credentials, no secret files read)
    #[arg(long, env = "DDNS_DEBUG")]
    debug: bool,

    /// File containing the AWS Access Key ID
    #[arg(long = "aws.accessKeyID", env = "DDNS_AWS_ACCESS_KEY_ID_FILE", value_name = "PATH")]
    access_key_file: Option<PathBuf>,

    /// File containing the AWS Secret Access Key
    #[arg(long = "aws.SecretAccessKey", env = "DDNS_AWS_SECRET_ACCESS_KEY_FILE", value_name = "PATH")]
    secret_key_file: Option<PathBuf>,

    /// Credential source when no key files are given
    #[arg(long, env = "DDNS_CREDENTIALS", value_enum, default_value_t = CredentialKind::Chain)]
    credentials: CredentialKind,

    /// Shared-config profile used by the AWS default chain
    #[arg(long = "aws.profile", env = "DDNS_AWS_PROFILE", value_name = "NAME")]
    profile: Option<String>,

    /// Hosted zone id
    #[arg(long = "route53.hostedzone", env = "DDNS_ROUTE53_HOSTEDZONE", default_value = "")]
    hosted_zone: String,

    /// Name of the A record
    #[arg(long = "route53.A.name", env = "DDNS_ROUTE53_A_NAME", default_value = "")]
    a_name: String,

    /// Name of the AAAA record
    #[arg(long = "route53.AAAA.name", env = "DDNS_ROUTE53_AAAA_NAME", default_value = "")]
    aaaa_name: String,

    /// Alternate Route 53 endpoint
    #[arg(long = "route53.endpoint", env = "DDNS_ROUTE53_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,

    /// Address discovery strategy
    #[arg(long, env = "DDNS_DISCOVERY", value_enum, default_value_t = Discovery::Dns)]
    discovery: Discovery,

    /// Echo service URL for HTTP discovery
    #[arg(long = "discovery.url", env = "DDNS_DISCOVERY_URL", value_name = "URL")]
    discovery_url: Option<String>,

    /// Discovery timeout in seconds
    #[arg(long, env = "DDNS_TIMEOUT", default_value_t = 10, value_name = "SECS")]
    timeout: u64,

    /// Submission timeout in seconds
    #[arg(long = "submit-timeout", env = "DDNS_SUBMIT_TIMEOUT", default_value_t = 30, value_name = "SECS")]
    submit_timeout: u64,

    /// Log the change requests instead of submitting them
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    /// Run configuration described by the flags
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(self.hosted_zone.clone())
            .with_discovery_timeout(Duration::from_secs(self.timeout))
            .with_submission_timeout(Duration::from_secs(self.submit_timeout));
        if self.ipv4 {
            config = config.with_ipv4(self.a_name.clone());
        }
        if self.ipv6 {
            config = config.with_ipv6(self.aaaa_name.clone());
        }
        config
    }

    /// Validate everything that can be checked before touching the network
    fn validate(&self) -> Result<RunConfig> {
        let config = self.run_config();
        config.validate()?;
        self.log_level()?;

        if self.access_key_file.is_some() != self.secret_key_file.is_some() && !self.debug {
            anyhow::bail!("aws.accessKeyID and aws.SecretAccessKey must be given together");
        }

        if self.profile.is_some() && self.credentials != CredentialKind::Chain {
            anyhow::bail!("aws.profile only applies to --credentials chain");
        }

        if self.discovery == Discovery::Dns && self.discovery_url.is_some() {
            anyhow::bail!("discovery.url only applies to --discovery http");
        }

        if let Some(ref url) = self.discovery_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            anyhow::bail!("discovery.url must use HTTP or HTTPS scheme. Got: {}", url);
        }

        Ok(config)
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "log-level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Pick the credential source
    ///
    /// Debug mode wins over key files; key files win over `--credentials`.
    fn credential_source(&self) -> Box<dyn CredentialSource> {
        if self.debug {
            return Box::new(StaticCredentials::placeholder());
        }

        if let (Some(access), Some(secret)) = (&self.access_key_file, &self.secret_key_file) {
            return Box::new(FileCredentials::new(access, secret));
        }

        match self.credentials {
            CredentialKind::Env => Box::new(EnvCredentials::new()),
            CredentialKind::Chain => match self.profile {
                Some(ref profile) => Box::new(AwsDefaultChain::with_profile(profile)),
                None => Box::new(AwsDefaultChain::new()),
            },
        }
    }

    fn discoverer(&self) -> Result<Arc<dyn AddressDiscoverer>> {
        match self.discovery {
            Discovery::Dns => Ok(Arc::new(DnsEchoDiscoverer::new())),
            #[cfg(feature = "http")]
            Discovery::Http => {
                let url = self
                    .discovery_url
                    .clone()
                    .unwrap_or_else(|| ddns_ip_http::DEFAULT_ECHO_URL.to_string());
                Ok(Arc::new(ddns_ip_http::HttpEchoDiscoverer::new(url)))
            }
            #[cfg(not(feature = "http"))]
            Discovery::Http => {
                anyhow::bail!("HTTP discovery is not available in this build")
            }
        }
    }

    fn dry_run(&self) -> bool {
        self.dry_run || ddns_provider_route53::dry_run_from_env()
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::Success.into()
            };
        }
    };

    let config = match args.validate() {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let log_level = args.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::RuntimeError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(args, config)).into()
}

/// Print the usage line and the error to stderr
fn report_config_error(e: &dyn std::fmt::Display) {
    eprintln!("{}", Args::command().render_usage());
    eprintln!("Configuration error: {}", e);
}

/// Load credentials, build the pipeline and run one pass
async fn run(args: Args, config: RunConfig) -> DdnsExitCode {
    let source = args.credential_source();
    info!("Loading credentials from {}", source.source_name());

    let credentials = match source.load().await {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Credential error: {}", e);
            report_config_error(&e);
            return DdnsExitCode::ConfigError;
        }
    };

    let discoverer = match args.discoverer() {
        Ok(discoverer) => discoverer,
        Err(e) => {
            error!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let mut options = Route53Options::default()
        .with_submission_timeout(config.submission_timeout)
        .with_dry_run(args.dry_run());
    if let Some(ref url) = args.endpoint {
        options = options.with_endpoint_url(url);
    }

    let provider = Route53Provider::new(credentials, options);
    let reconciler = RecordReconciler::new(Box::new(provider), config.submission_timeout);

    let engine = match DdnsEngine::new(discoverer, reconciler, config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let report = engine.reconcile().await;

    for outcome in &report.outcomes {
        match &outcome.status {
            FamilyStatus::Updated { value, receipt } => info!(
                "{} {} -> {} (change {}, {})",
                outcome.record_type, outcome.record_name, value, receipt.change_id, receipt.status
            ),
            FamilyStatus::Skipped { reason } => {
                warn!("{} {} skipped: {}", outcome.record_type, outcome.record_name, reason)
            }
            FamilyStatus::Failed { value, error } => error!(
                "{} {} -> {} failed: {}",
                outcome.record_type, outcome.record_name, value, error
            ),
        }
    }

    exit_code_for(&report)
}

/// Skipped families do not fail the run; any failed submission does
fn exit_code_for(report: &ReconcileReport) -> DdnsExitCode {
    if report.has_failures() {
        DdnsExitCode::RuntimeError
    } else {
        DdnsExitCode::Success
    }
}
