//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AddressDiscoverer`]: Discover the caller's public address for one family
//! - [`DnsProvider`]: Apply an upsert via a provider's record API
//! - [`CredentialSource`]: Acquire provider credentials

pub mod address_discoverer;
pub mod credential_source;
pub mod dns_provider;

pub use address_discoverer::{AddressDiscoverer, AddressFamily, ResolvedAddress};
pub use credential_source::{CredentialSource, Credentials};
pub use dns_provider::{ChangeReceipt, DnsProvider, RecordChangeRequest, RecordType};
