//! Contract Test: Single Reconcile Pass
//!
//! Verifies the discover → select → upsert flow for each enabled family.
//!
//! Constraints verified:
//! - The first usable candidate is the one submitted
//! - Requests carry the fixed TTL/weight/identifier policy
//! - The AAAA record is written under the AAAA name
//! - Disabled families are never queried
//! - The configured discovery timeout is passed to the discoverer

mod common;

use common::*;
use ddns_core::traits::{AddressFamily, RecordType};
use ddns_core::{FamilyStatus, RunConfig};
use std::net::IpAddr;
use std::time::Duration;

#[tokio::test]
async fn ipv4_example_scenario() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new().answer(AddressFamily::V4, vec!["203.0.113.5"]);
    let config = RunConfig::new("Z1").with_ipv4("home.example.com");

    let (engine, _) = engine_with(discoverer, provider.clone(), config);
    let report = engine.reconcile().await;

    assert_eq!(report.updated_count(), 1);
    assert!(!report.has_failures());

    let submitted = provider.submitted();
    assert_eq!(submitted.len(), 1);
    let request = &submitted[0];
    assert_eq!(request.hosted_zone_id, "Z1");
    assert_eq!(request.record_name, "home.example.com");
    assert_eq!(request.record_type, RecordType::A);
    assert_eq!(request.record_value, "203.0.113.5");
    assert_eq!(request.ttl_seconds, 60);
    assert_eq!(request.weight, 1);
    assert_eq!(
        request.set_identifier,
        "Update the A record for home.example.com"
    );
    assert_eq!(request.comment, request.set_identifier);
}

#[tokio::test]
async fn dual_stack_writes_each_family_under_its_own_name() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new()
        .answer(AddressFamily::V4, vec!["203.0.113.5"])
        .answer(AddressFamily::V6, vec!["2001:db8::5"]);

    let (engine, stub) = engine_with(discoverer, provider.clone(), dual_stack_config());
    let report = engine.reconcile().await;

    assert_eq!(report.updated_count(), 2);
    assert_eq!(
        provider.value("Z1", "home.example.com", RecordType::A),
        Some("203.0.113.5".to_string())
    );
    assert_eq!(
        provider.value("Z1", "home6.example.com", RecordType::Aaaa),
        Some("2001:db8::5".to_string())
    );
    assert_eq!(provider.value("Z1", "home.example.com", RecordType::Aaaa), None);

    let aaaa = report.outcome(AddressFamily::V6).unwrap();
    assert_eq!(aaaa.record_type, RecordType::Aaaa);
    assert_eq!(
        provider.submitted()[1].set_identifier,
        "Update the AAAA record for home6.example.com"
    );

    // IPv4 first, then IPv6
    let families: Vec<_> = stub.calls().into_iter().map(|(f, _)| f).collect();
    assert_eq!(families, vec![AddressFamily::V4, AddressFamily::V6]);
}

#[tokio::test]
async fn only_first_usable_candidate_is_submitted() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new().answer(
        AddressFamily::V4,
        vec!["not-an-address", "198.51.100.7", "198.51.100.8"],
    );
    let config = RunConfig::new("Z1").with_ipv4("home.example.com");

    let (engine, _) = engine_with(discoverer, provider.clone(), config);
    let report = engine.reconcile().await;

    match &report.outcome(AddressFamily::V4).unwrap().status {
        FamilyStatus::Updated { value, receipt } => {
            assert_eq!(*value, IpAddr::from([198, 51, 100, 7]));
            assert_eq!(receipt.status, "PENDING");
        }
        other => panic!("expected Updated, got {:?}", other),
    }
    assert_eq!(provider.upsert_calls(), 1);
}

#[tokio::test]
async fn disabled_family_is_not_queried() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new()
        .answer(AddressFamily::V4, vec!["203.0.113.5"])
        .answer(AddressFamily::V6, vec!["2001:db8::5"]);
    let config = RunConfig::new("Z1").with_ipv6("home6.example.com");

    let (engine, stub) = engine_with(discoverer, provider.clone(), config);
    let report = engine.reconcile().await;

    assert_eq!(report.outcomes.len(), 1);
    assert!(report.outcome(AddressFamily::V4).is_none());
    assert_eq!(stub.calls().len(), 1);
    assert_eq!(stub.calls()[0].0, AddressFamily::V6);
    assert_eq!(provider.record_count(), 1);
}

#[tokio::test]
async fn discovery_timeout_is_forwarded() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new().answer(AddressFamily::V4, vec!["203.0.113.5"]);
    let config = RunConfig::new("Z1")
        .with_ipv4("home.example.com")
        .with_discovery_timeout(Duration::from_secs(3));

    let (engine, stub) = engine_with(discoverer, provider, config);
    engine.reconcile().await;

    assert_eq!(stub.calls(), vec![(AddressFamily::V4, Duration::from_secs(3))]);
}

#[test]
fn invalid_config_fails_fast_without_network() {
    let provider = FakeProvider::new();
    let discoverer = std::sync::Arc::new(StubDiscoverer::new());
    let reconciler = ddns_core::RecordReconciler::new(
        Box::new(provider.clone()),
        Duration::from_secs(30),
    );

    // Neither family enabled
    let result = ddns_core::DdnsEngine::new(discoverer.clone(), reconciler, RunConfig::new("Z1"));

    let err = result.err().expect("construction must fail");
    assert!(err.is_configuration());
    assert!(discoverer.calls().is_empty());
    assert_eq!(provider.upsert_calls(), 0);
}
