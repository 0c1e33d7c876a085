// # Address Discoverer Trait
//
// Defines the interface for learning the caller's externally visible address
// for one address family.
//
// ## Implementations
//
// - DNS echo (`o-o.myaddr.l.google.com` via `ns1.google.com`): `ddns-ip-dns` crate
// - HTTP echo service: `ddns-ip-http` crate
// - Future: STUN, router UPnP queries
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{AddressDiscoverer, AddressFamily};
// use std::time::Duration;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let discoverer = /* AddressDiscoverer implementation */;
//
//     let resolved = discoverer
//         .discover(AddressFamily::V4, Duration::from_secs(10))
//         .await?;
//
//     if let Some(ip) = resolved.first_usable() {
//         println!("public IPv4: {}", ip);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use crate::traits::dns_provider::RecordType;

/// IP address family (v4 or v6)
///
/// Selects both the transport a discovery query travels over and the DNS
/// record type the reconciler targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Both families, in the order a run processes them
    pub const ALL: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];

    /// DNS record type holding addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::Aaaa,
        }
    }

    /// Transport name used when dialing (`udp4` / `udp6`)
    pub fn transport(self) -> &'static str {
        match self {
            AddressFamily::V4 => "udp4",
            AddressFamily::V6 => "udp6",
        }
    }

    /// Unspecified local address of this family, for binding sockets
    pub fn unspecified(self) -> IpAddr {
        match self {
            AddressFamily::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }

    /// Whether `ip` belongs to this family
    pub fn matches(self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// Candidate addresses returned by a single discovery query
///
/// May be empty. Only one candidate is ever consumed downstream, see
/// [`ResolvedAddress::first_usable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Family the query was made for
    pub family: AddressFamily,
    /// Raw answer strings, in the order they were received
    pub candidates: Vec<String>,
}

impl ResolvedAddress {
    /// Create a resolved address from raw candidate strings
    pub fn new(family: AddressFamily, candidates: Vec<String>) -> Self {
        Self { family, candidates }
    }

    /// A result with no candidates
    pub fn empty(family: AddressFamily) -> Self {
        Self::new(family, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// First raw candidate, if any
    pub fn first(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }

    /// First candidate that parses as an address of this result's family
    ///
    /// Candidates that are not addresses (or belong to the other family) are
    /// passed over. Returns `None` when nothing usable was discovered; callers
    /// must skip submission in that case.
    pub fn first_usable(&self) -> Option<IpAddr> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.trim().parse::<IpAddr>().ok())
            .find(|ip| self.family.matches(ip))
    }
}

/// Trait for public address discovery
///
/// # Contract
///
/// - One query per call; no retries (the caller decides whether to try again)
/// - The `timeout` bounds the whole operation and must be enforced
/// - Must not consult local interfaces, which only yield private/NAT addresses
/// - May return an empty [`ResolvedAddress`]
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait AddressDiscoverer: Send + Sync {
    /// Discover the public address for `family`
    ///
    /// # Parameters
    ///
    /// - `family`: Address family (selects the transport)
    /// - `timeout`: Upper bound on the network exchange
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedAddress)`: Zero or more candidate address strings
    /// - `Err(Error)`: Timeout, unreachable network, no route for the family,
    ///   malformed response
    async fn discover(
        &self,
        family: AddressFamily,
        timeout: Duration,
    ) -> Result<ResolvedAddress, crate::Error>;

    /// Name of the discovery strategy (for logging)
    fn discoverer_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_mapping() {
        assert_eq!(AddressFamily::V4.record_type(), RecordType::A);
        assert_eq!(AddressFamily::V6.record_type(), RecordType::Aaaa);
        assert_eq!(AddressFamily::V4.transport(), "udp4");
        assert_eq!(AddressFamily::V6.transport(), "udp6");
        assert!(AddressFamily::V4.unspecified().is_ipv4());
        assert!(AddressFamily::V6.unspecified().is_ipv6());
    }

    #[test]
    fn test_first_usable_skips_garbage_and_other_family() {
        let resolved = ResolvedAddress::new(
            AddressFamily::V4,
            vec![
                "edns0-client-subnet 198.51.100.0/24".to_string(),
                "2001:db8::1".to_string(),
                "203.0.113.5".to_string(),
                "203.0.113.6".to_string(),
            ],
        );

        assert_eq!(resolved.first(), Some("edns0-client-subnet 198.51.100.0/24"));
        assert_eq!(
            resolved.first_usable(),
            Some(IpAddr::from([203, 0, 113, 5]))
        );
    }

    #[test]
    fn test_empty_has_nothing_usable() {
        let resolved = ResolvedAddress::empty(AddressFamily::V6);
        assert!(resolved.is_empty());
        assert_eq!(resolved.first(), None);
        assert_eq!(resolved.first_usable(), None);
    }

    #[test]
    fn test_v6_candidate() {
        let resolved =
            ResolvedAddress::new(AddressFamily::V6, vec!["2001:db8::42".to_string()]);
        assert_eq!(
            resolved.first_usable(),
            Some("2001:db8::42".parse::<IpAddr>().unwrap())
        );
    }
}
