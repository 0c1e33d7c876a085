// # DNS Provider Trait
//
// Defines the interface for applying a record change via a provider API, and
// the provider-neutral change request it consumes.
//
// ## Implementations
//
// - Route 53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordChangeRequest, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let request = RecordChangeRequest::upsert(
//         "Z1",
//         "home.example.com",
//         RecordType::A,
//         "203.0.113.5",
//     );
//     let receipt = provider.upsert(&request).await?;
//     println!("change {} is {}", receipt.change_id, receipt.status);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL applied to every managed record
pub const RECORD_TTL_SECONDS: i64 = 60;

/// Routing weight applied to every managed record
pub const RECORD_WEIGHT: i64 = 1;

/// DNS record type managed by the updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One desired upsert of a single-value record
///
/// The request always carries exactly one value; the record sets managed here
/// are single-value entries. Weight and set identifier are fixed labels, not a
/// load-distribution setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChangeRequest {
    pub hosted_zone_id: String,
    pub record_name: String,
    pub record_type: RecordType,
    pub record_value: String,
    pub ttl_seconds: i64,
    pub weight: i64,
    pub set_identifier: String,
    pub comment: String,
}

impl RecordChangeRequest {
    /// Build an upsert request
    ///
    /// Pure construction: identical inputs always produce an identical request.
    /// TTL is [`RECORD_TTL_SECONDS`], weight is [`RECORD_WEIGHT`], and both the
    /// set identifier and the batch comment read
    /// `"Update the <type> record for <name>"`.
    pub fn upsert(
        hosted_zone_id: impl Into<String>,
        record_name: impl Into<String>,
        record_type: RecordType,
        record_value: impl Into<String>,
    ) -> Self {
        let record_name = record_name.into();
        let label = format!("Update the {} record for {}", record_type, record_name);

        Self {
            hosted_zone_id: hosted_zone_id.into(),
            record_name,
            record_type,
            record_value: record_value.into(),
            ttl_seconds: RECORD_TTL_SECONDS,
            weight: RECORD_WEIGHT,
            set_identifier: label.clone(),
            comment: label,
        }
    }
}

/// Provider acknowledgment of an accepted change
///
/// Acceptance only; propagation to authoritative nameservers is not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReceipt {
    /// Provider-assigned change identifier
    pub change_id: String,
    /// Provider status at acceptance time (e.g. `PENDING`)
    pub status: String,
    /// When the provider recorded the submission
    pub submitted_at: Option<DateTime<Utc>>,
    /// True when the change was only logged, not submitted
    pub dry_run: bool,
}

impl ChangeReceipt {
    /// Receipt for a change that was logged instead of submitted
    pub fn dry_run() -> Self {
        Self {
            change_id: "dry-run".to_string(),
            status: "DRY_RUN".to_string(),
            submitted_at: Some(Utc::now()),
            dry_run: true,
        }
    }
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - One API call per `upsert`; no retries, no backoff
/// - Upsert semantics: create if absent, overwrite if present, so repeated
///   calls with the same request converge
/// - No state kept between calls
/// - Credentials never appear in logs or error messages
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Submit one upsert and wait for the provider to accept it
    ///
    /// # Parameters
    ///
    /// - `request`: The change to apply
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeReceipt)`: The provider accepted the change
    /// - `Err(Error)`: Transport failure, authentication failure or rejection
    async fn upsert(&self, request: &RecordChangeRequest) -> Result<ChangeReceipt, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
