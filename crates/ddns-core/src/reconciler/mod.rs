//! Record reconciler
//!
//! Turns a (zone, name, type, value) tuple into a [`RecordChangeRequest`] and
//! submits it through a [`DnsProvider`], bounded by a submission timeout.
//!
//! The reconciler never retries. A failed submission is reported to the
//! caller; the next scheduled run is the retry.

use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::traits::{ChangeReceipt, DnsProvider, RecordChangeRequest, RecordType};

/// Builds and submits upsert requests
pub struct RecordReconciler {
    /// DNS provider receiving the changes
    provider: Box<dyn DnsProvider>,

    /// Upper bound on one submission
    submission_timeout: Duration,
}

impl RecordReconciler {
    /// Create a reconciler
    ///
    /// # Parameters
    ///
    /// - `provider`: DNS provider implementation, constructed once per run
    /// - `submission_timeout`: Deadline applied to every `submit`
    pub fn new(provider: Box<dyn DnsProvider>, submission_timeout: Duration) -> Self {
        Self {
            provider,
            submission_timeout,
        }
    }

    /// Build the upsert request for one record. Pure, no I/O.
    pub fn build_request(
        &self,
        hosted_zone_id: &str,
        record_name: &str,
        record_type: RecordType,
        record_value: &str,
    ) -> RecordChangeRequest {
        RecordChangeRequest::upsert(hosted_zone_id, record_name, record_type, record_value)
    }

    /// Submit one request and wait for the provider to accept it
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeReceipt)`: Accepted (not necessarily propagated)
    /// - `Err(Error::Timeout)`: The provider did not answer in time
    /// - `Err(Error)`: Whatever the provider reported
    pub async fn submit(&self, request: &RecordChangeRequest) -> Result<ChangeReceipt> {
        debug!(
            "Submitting {} {} -> {} to {} (zone {})",
            request.record_type,
            request.record_name,
            request.record_value,
            self.provider.provider_name(),
            request.hosted_zone_id
        );

        let receipt = tokio::time::timeout(self.submission_timeout, self.provider.upsert(request))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "{} did not accept the {} change for {} within {:?}",
                    self.provider.provider_name(),
                    request.record_type,
                    request.record_name,
                    self.submission_timeout
                ))
            })??;

        info!(
            "{} {} -> {} accepted (change {}, status {}{})",
            request.record_type,
            request.record_name,
            request.record_value,
            receipt.change_id,
            receipt.status,
            if receipt.dry_run { ", dry-run" } else { "" }
        );

        Ok(receipt)
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }
}
