// # DNS Echo Address Discovery
//
// This crate discovers the caller's public address by asking a DNS server
// that echoes the query's source address back as a TXT answer.
//
// ## Mechanism
//
// A TXT query for `o-o.myaddr.l.google.com` is sent straight to
// `ns1.google.com:53` over UDP, on a socket bound to the requested family.
// The authoritative server answers with the address the query arrived from,
// which is the externally visible (post-NAT) address for that family.
//
// The system resolver is only used to find `ns1.google.com` itself. The TXT
// query never goes through it: the echo is only meaningful when the packet
// reaches the echo server directly.
//
// ## Limitations
//
// For IPv6 the echoed address is the one this host used as source, i.e. the
// host's own global address, not a gateway's. Behind NPTv6 or a v6 NAT that
// may not be the address reachable from the internet.
//
// ## Behavior
//
// - One datagram out, one answer in, bounded by the caller's timeout
// - No retries, no caching

use async_trait::async_trait;
use ddns_core::traits::{AddressDiscoverer, AddressFamily, ResolvedAddress};
use ddns_core::{Error, Result};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Echo server queried by default
pub const DEFAULT_RESOLVER: &str = "ns1.google.com:53";

/// Question name answered with the querier's address
pub const DEFAULT_QUERY_NAME: &str = "o-o.myaddr.l.google.com.";

/// Large enough for any UDP answer with EDNS
const MAX_DATAGRAM: usize = 4096;

/// DNS echo discoverer
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::traits::{AddressDiscoverer, AddressFamily};
/// use ddns_ip_dns::DnsEchoDiscoverer;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let discoverer = DnsEchoDiscoverer::new();
///     let resolved = discoverer
///         .discover(AddressFamily::V4, Duration::from_secs(10))
///         .await?;
///     println!("{:?}", resolved.first_usable());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DnsEchoDiscoverer {
    /// `host:port` of the echo server
    resolver: String,

    /// Fully qualified question name
    query_name: String,
}

impl DnsEchoDiscoverer {
    /// Discoverer for the Google echo service
    pub fn new() -> Self {
        Self::with_resolver(DEFAULT_RESOLVER, DEFAULT_QUERY_NAME)
    }

    /// Discoverer for a different echo server or question name
    pub fn with_resolver(resolver: impl Into<String>, query_name: impl Into<String>) -> Self {
        Self {
            resolver: resolver.into(),
            query_name: query_name.into(),
        }
    }

    /// Resolve the echo server to a socket address of `family`
    async fn resolver_addr(&self, family: AddressFamily) -> Result<SocketAddr> {
        let addrs = tokio::net::lookup_host(self.resolver.as_str())
            .await
            .map_err(|e| {
                Error::discovery(format!("Failed to resolve {}: {}", self.resolver, e))
            })?;

        addrs
            .into_iter()
            .find(|addr| family.matches(&addr.ip()))
            .ok_or_else(|| {
                Error::discovery(format!(
                    "No {} address for {} (no route for {})",
                    family,
                    self.resolver,
                    family.transport()
                ))
            })
    }

    /// Encode a recursion-desired TXT query
    fn build_query(&self, id: u16) -> Result<Vec<u8>> {
        let name = Name::from_ascii(&self.query_name).map_err(|e| {
            Error::invalid_input(format!("Invalid query name {}: {}", self.query_name, e))
        })?;

        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        message.add_query(Query::query(name, RecordType::TXT));

        message
            .to_vec()
            .map_err(|e| Error::discovery(format!("Failed to encode query: {}", e)))
    }

    /// Send one query and wait for the answer carrying our id
    async fn exchange(&self, family: AddressFamily) -> Result<Vec<String>> {
        let server = self.resolver_addr(family).await?;

        let socket = UdpSocket::bind(SocketAddr::new(family.unspecified(), 0)).await?;
        socket.connect(server).await?;

        let id = rand::random::<u16>();
        let query = self.build_query(id)?;

        tracing::debug!(
            "Sending TXT {} query to {} over {} (id {})",
            self.query_name,
            server,
            family.transport(),
            id
        );
        socket.send(&query).await?;

        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let len = socket.recv(&mut buf).await?;
            let response = Message::from_vec(&buf[..len]).map_err(|e| {
                Error::discovery(format!("Malformed response from {}: {}", server, e))
            })?;

            if response.id() != id {
                tracing::debug!("Ignoring response with id {} (want {})", response.id(), id);
                continue;
            }

            return parse_answer(&response);
        }
    }
}

impl Default for DnsEchoDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect one string per TXT record, joining its character-strings
fn parse_answer(response: &Message) -> Result<Vec<String>> {
    if response.message_type() != MessageType::Response {
        return Err(Error::discovery("Received a query instead of a response"));
    }

    if response.response_code() != ResponseCode::NoError {
        return Err(Error::discovery(format!(
            "Echo server answered {}",
            response.response_code()
        )));
    }

    let candidates = response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::TXT(txt) => Some(
                txt.txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect();

    Ok(candidates)
}

#[async_trait]
impl AddressDiscoverer for DnsEchoDiscoverer {
    async fn discover(&self, family: AddressFamily, timeout: Duration) -> Result<ResolvedAddress> {
        let candidates = tokio::time::timeout(timeout, self.exchange(family))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "No answer from {} over {} within {:?}",
                    self.resolver,
                    family.transport(),
                    timeout
                ))
            })??;

        tracing::debug!("{} echo answered {:?}", family, candidates);
        Ok(ResolvedAddress::new(family, candidates))
    }

    fn discoverer_name(&self) -> &'static str {
        "dns"
    }
}
