//! Core DDNS engine
//!
//! The DdnsEngine runs one stateless reconcile pass:
//! - Discovering the public address per enabled family via AddressDiscoverer
//! - Selecting the first usable candidate
//! - Upserting the family's record via RecordReconciler
//! - Reporting one outcome per family
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ AddressDiscoverer  │─── ResolvedAddress ───┐
//! └────────────────────┘                       │
//!                                              ▼
//!                                     ┌──────────────┐
//!                                     │  DdnsEngine  │
//!                                     └──────────────┘
//!                                              │
//!                    ┌─────────────────────────┴──────────────┐
//!                    ▼                                        ▼
//!          ┌───────────────────┐                    ┌──────────────────┐
//!          │ RecordReconciler  │── RecordChange ──▶ │   DnsProvider    │
//!          │ (build + submit)  │     Request        │    (upsert)      │
//!          └───────────────────┘                    └──────────────────┘
//! ```
//!
//! ## Flow per family
//!
//! 1. Discover candidates (discovery errors ⇒ family skipped, run continues)
//! 2. No usable candidate ⇒ family skipped, nothing submitted
//! 3. Build the upsert request and submit it
//! 4. Record the outcome; a failed submission does not stop the other family

use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::reconciler::RecordReconciler;
use crate::traits::{AddressDiscoverer, AddressFamily, ChangeReceipt, RecordType};

/// Why a family was skipped without submitting anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The discovery query failed
    DiscoveryFailed(String),
    /// Discovery returned no candidates
    NoCandidates,
    /// Discovery returned candidates, none of them an address of the family
    NoUsableCandidate(Vec<String>),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DiscoveryFailed(e) => write!(f, "discovery failed: {}", e),
            SkipReason::NoCandidates => f.write_str("discovery returned no candidates"),
            SkipReason::NoUsableCandidate(candidates) => {
                write!(f, "no usable address among {:?}", candidates)
            }
        }
    }
}

/// Result of processing one family
#[derive(Debug)]
pub enum FamilyStatus {
    /// The provider accepted the upsert
    Updated {
        value: IpAddr,
        receipt: ChangeReceipt,
    },
    /// Nothing was submitted
    Skipped { reason: SkipReason },
    /// The submission failed
    Failed { value: IpAddr, error: Error },
}

/// Outcome for one family
#[derive(Debug)]
pub struct FamilyOutcome {
    pub family: AddressFamily,
    pub record_name: String,
    pub record_type: RecordType,
    pub status: FamilyStatus,
}

impl FamilyOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self.status, FamilyStatus::Updated { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, FamilyStatus::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FamilyStatus::Failed { .. })
    }
}

/// Aggregated outcomes of one pass, in processing order
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<FamilyOutcome>,
}

impl ReconcileReport {
    /// Outcome for `family`, if it was enabled
    pub fn outcome(&self, family: AddressFamily) -> Option<&FamilyOutcome> {
        self.outcomes.iter().find(|o| o.family == family)
    }

    /// True if any submission failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(FamilyOutcome::is_failed)
    }

    pub fn updated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_updated()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`] (validates the configuration)
/// 2. Call [`DdnsEngine::reconcile()`] once
/// 3. Drop; nothing is persisted
///
/// ## Threading
///
/// Families are processed sequentially on the calling task. They share no
/// mutable state.
pub struct DdnsEngine {
    /// Public address discovery
    discoverer: Arc<dyn AddressDiscoverer>,

    /// Request construction and submission
    reconciler: RecordReconciler,

    /// Validated run configuration
    config: RunConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `discoverer`: Address discovery implementation
    /// - `reconciler`: Reconciler wrapping the DNS provider
    /// - `config`: Run configuration
    ///
    /// # Returns
    ///
    /// - `Ok(DdnsEngine)`: Ready to reconcile
    /// - `Err(Error::Config)`: The configuration is invalid
    pub fn new(
        discoverer: Arc<dyn AddressDiscoverer>,
        reconciler: RecordReconciler,
        config: RunConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            discoverer,
            reconciler,
            config,
        })
    }

    /// Run one pass over every enabled family
    pub async fn reconcile(&self) -> ReconcileReport {
        info!(
            "Reconciling {} family(ies) in zone {} (discovery: {}, provider: {})",
            self.config.enabled_families().len(),
            self.config.hosted_zone_id,
            self.discoverer.discoverer_name(),
            self.reconciler.provider_name()
        );

        let mut report = ReconcileReport::default();
        for family in self.config.enabled_families() {
            report.outcomes.push(self.reconcile_family(family).await);
        }

        info!(
            "Reconcile finished: {} updated, {} skipped, {} failed",
            report.updated_count(),
            report.skipped_count(),
            report.failed_count()
        );

        report
    }

    /// Discover and upsert a single family
    ///
    /// Does not check whether `family` is enabled; callers that bypass
    /// [`DdnsEngine::reconcile`] decide that themselves.
    pub async fn reconcile_family(&self, family: AddressFamily) -> FamilyOutcome {
        let record_name = self.config.record_name(family).to_string();
        let record_type = family.record_type();
        let outcome = |status| FamilyOutcome {
            family,
            record_name: record_name.clone(),
            record_type,
            status,
        };

        let resolved = match self
            .discoverer
            .discover(family, self.config.discovery_timeout)
            .await
        {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("{} discovery failed, skipping {}: {}", family, record_name, e);
                return outcome(FamilyStatus::Skipped {
                    reason: SkipReason::DiscoveryFailed(e.to_string()),
                });
            }
        };

        debug!("{} candidates: {:?}", family, resolved.candidates);

        let Some(value) = resolved.first_usable() else {
            let reason = if resolved.is_empty() {
                SkipReason::NoCandidates
            } else {
                SkipReason::NoUsableCandidate(resolved.candidates.clone())
            };
            warn!("Skipping {} record {}: {}", record_type, record_name, reason);
            return outcome(FamilyStatus::Skipped { reason });
        };

        info!("Public {} address: {}", family, value);

        let request = self.reconciler.build_request(
            &self.config.hosted_zone_id,
            &record_name,
            record_type,
            &value.to_string(),
        );

        match self.reconciler.submit(&request).await {
            Ok(receipt) => outcome(FamilyStatus::Updated { value, receipt }),
            Err(e) => {
                error!(
                    "Failed to upsert {} record {} -> {}: {}",
                    record_type, record_name, value, e
                );
                outcome(FamilyStatus::Failed { value, error: e })
            }
        }
    }
}
