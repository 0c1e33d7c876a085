//! Configuration types for the DDNS updater
//!
//! [`RunConfig`] is everything one reconcile pass needs besides the
//! discoverer, the provider and the credentials. Validation happens before any
//! network activity.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::traits::AddressFamily;

/// Default bound on one discovery query
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on one provider submission
pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single reconcile pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Update the A record
    #[serde(default)]
    pub enable_ipv4: bool,

    /// Update the AAAA record
    #[serde(default)]
    pub enable_ipv6: bool,

    /// Provider hosted zone identifier
    pub hosted_zone_id: String,

    /// Name of the A record
    #[serde(default)]
    pub a_record_name: String,

    /// Name of the AAAA record
    #[serde(default)]
    pub aaaa_record_name: String,

    /// Upper bound on each discovery query
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout: Duration,

    /// Upper bound on each provider submission
    #[serde(default = "default_submission_timeout")]
    pub submission_timeout: Duration,
}

impl RunConfig {
    /// Create a configuration for `hosted_zone_id` with no family enabled
    pub fn new(hosted_zone_id: impl Into<String>) -> Self {
        Self {
            enable_ipv4: false,
            enable_ipv6: false,
            hosted_zone_id: hosted_zone_id.into(),
            a_record_name: String::new(),
            aaaa_record_name: String::new(),
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
        }
    }

    /// Enable IPv4 and set the A record name
    pub fn with_ipv4(mut self, a_record_name: impl Into<String>) -> Self {
        self.enable_ipv4 = true;
        self.a_record_name = a_record_name.into();
        self
    }

    /// Enable IPv6 and set the AAAA record name
    pub fn with_ipv6(mut self, aaaa_record_name: impl Into<String>) -> Self {
        self.enable_ipv6 = true;
        self.aaaa_record_name = aaaa_record_name.into();
        self
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = timeout;
        self
    }

    /// Whether `family` is enabled
    pub fn is_enabled(&self, family: AddressFamily) -> bool {
        match family {
            AddressFamily::V4 => self.enable_ipv4,
            AddressFamily::V6 => self.enable_ipv6,
        }
    }

    /// Record name managed for `family`
    pub fn record_name(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.a_record_name,
            AddressFamily::V6 => &self.aaaa_record_name,
        }
    }

    /// Enabled families, IPv4 first
    pub fn enabled_families(&self) -> Vec<AddressFamily> {
        AddressFamily::ALL
            .into_iter()
            .filter(|family| self.is_enabled(*family))
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.enable_ipv4 && !self.enable_ipv6 {
            return Err(crate::Error::config("Both ipv4 and ipv6 are false!"));
        }

        if self.enable_ipv4 && self.a_record_name.is_empty() {
            return Err(crate::Error::config("route53.A.name is missing"));
        }

        if self.enable_ipv6 && self.aaaa_record_name.is_empty() {
            return Err(crate::Error::config("route53.AAAA.name is missing"));
        }

        if self.hosted_zone_id.trim().is_empty() {
            return Err(crate::Error::config("route53.hostedzone is missing"));
        }

        for family in self.enabled_families() {
            validate_record_name(self.record_name(family))?;
        }

        if self.discovery_timeout.is_zero() {
            return Err(crate::Error::config("Discovery timeout must be > 0"));
        }

        if self.submission_timeout.is_zero() {
            return Err(crate::Error::config("Submission timeout must be > 0"));
        }

        Ok(())
    }
}

/// Validate that a string is a usable DNS record name
///
/// Basic RFC 1035 checks plus what hosted zones accept in practice: a leading
/// `*` wildcard label, underscores, and an optional trailing dot.
pub fn validate_record_name(name: &str) -> Result<(), crate::Error> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);

    if trimmed.is_empty() {
        return Err(crate::Error::config("Record name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if trimmed.len() > 253 {
        return Err(crate::Error::config(format!(
            "Record name too long: {} chars (max 253). Got: {}",
            trimmed.len(),
            name
        )));
    }

    for (index, label) in trimmed.split('.').enumerate() {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Record name has empty label: '{}'",
                name
            )));
        }

        if label == "*" && index == 0 {
            continue;
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Record label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(crate::Error::config(format!(
                "Record label contains invalid characters. Label: '{}'. \
                Valid: letters, digits, hyphen and underscore.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Record label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_discovery_timeout() -> Duration {
    DEFAULT_DISCOVERY_TIMEOUT
}

fn default_submission_timeout() -> Duration {
    DEFAULT_SUBMISSION_TIMEOUT
}
