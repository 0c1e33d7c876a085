// # ddns-core
//
// Core library for the single-pass DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **AddressDiscoverer**: Trait for discovering the public address of one family
// - **DnsProvider**: Trait for upserting a record via a provider API
// - **CredentialSource**: Trait for acquiring provider credentials
// - **RecordReconciler**: Builds upsert requests and submits them with a deadline
// - **DdnsEngine**: Runs one discover → upsert pass per enabled family
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Stateless**: Every run re-derives the desired state; nothing is cached
// 3. **Pluggable**: Discovery, provider and credentials are trait objects
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: Upsert semantics make repeated runs converge

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::RunConfig;
pub use engine::{DdnsEngine, FamilyOutcome, FamilyStatus, ReconcileReport, SkipReason};
pub use error::{Error, Result};
pub use reconciler::RecordReconciler;
pub use traits::{
    AddressDiscoverer, AddressFamily, ChangeReceipt, CredentialSource, Credentials, DnsProvider,
    RecordChangeRequest, RecordType, ResolvedAddress,
};
