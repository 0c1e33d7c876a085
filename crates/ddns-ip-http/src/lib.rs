// # HTTP Echo Address Discovery
//
// This crate provides an HTTP-based AddressDiscoverer for the DDNS updater.
//
// ## Purpose
//
// This is a **fallback discoverer** for networks where outbound DNS to
// arbitrary servers is blocked or intercepted. Prefer the DNS echo
// discoverer (ddns-ip-dns) otherwise.
//
// ## Architecture
//
// Fetches the caller's address from an echo service that returns it as a
// plain-text body (e.g. `https://api64.ipify.org`). The HTTP client is bound
// to the family's unspecified local address, so the connection (and thus the
// echoed address) uses the requested family.

use async_trait::async_trait;
use ddns_core::traits::{AddressDiscoverer, AddressFamily, ResolvedAddress};
use ddns_core::{Error, Result};
use std::time::Duration;

/// Dual-stack echo service used by default
pub const DEFAULT_ECHO_URL: &str = "https://api64.ipify.org";

/// HTTP echo discoverer
#[derive(Debug, Clone)]
pub struct HttpEchoDiscoverer {
    /// URL returning the caller's address as text
    url: String,
}

impl HttpEchoDiscoverer {
    /// Create a new HTTP echo discoverer
    ///
    /// # Parameters
    ///
    /// - `url`: Echo service URL (e.g., "https://api64.ipify.org")
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Client whose connections originate from `family`
    fn client_for(&self, family: AddressFamily, timeout: Duration) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .local_address(family.unspecified())
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))
    }
}

impl Default for HttpEchoDiscoverer {
    fn default() -> Self {
        Self::new(DEFAULT_ECHO_URL)
    }
}

#[async_trait]
impl AddressDiscoverer for HttpEchoDiscoverer {
    async fn discover(&self, family: AddressFamily, timeout: Duration) -> Result<ResolvedAddress> {
        let client = self.client_for(family, timeout)?;

        let response = client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("{} did not answer within {:?}", self.url, timeout))
            } else {
                Error::discovery(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::discovery(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::discovery(format!("Failed to read response: {}", e)))?;

        let ip_text = ip_text.trim();
        tracing::debug!("{} echo from {}: {}", family, self.url, ip_text);

        // Parsing and family filtering happen downstream
        let candidates = if ip_text.is_empty() {
            Vec::new()
        } else {
            vec![ip_text.to_string()]
        };

        Ok(ResolvedAddress::new(family, candidates))
    }

    fn discoverer_name(&self) -> &'static str {
        "http"
    }
}
