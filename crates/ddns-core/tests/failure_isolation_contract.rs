//! Contract Test: Per-Family Failure Isolation
//!
//! Discovery failures and empty answers skip a family; submission failures are
//! reported per family and never suppress the other family.
//!
//! Constraints verified:
//! - Zero candidates ⇒ no submission for that family
//! - Candidates with nothing usable ⇒ no submission
//! - Discovery error ⇒ family skipped, run continues, no failure reported
//! - Submission error for IPv4 ⇒ IPv6 is still processed and reported

mod common;

use common::*;
use ddns_core::traits::{AddressFamily, RecordType};
use ddns_core::{Error, FamilyStatus, RunConfig, SkipReason};

#[tokio::test]
async fn empty_candidates_never_submit() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new().answer(AddressFamily::V4, vec![]);
    let config = RunConfig::new("Z1").with_ipv4("home.example.com");

    let (engine, _) = engine_with(discoverer, provider.clone(), config);
    let report = engine.reconcile().await;

    assert_eq!(provider.upsert_calls(), 0);
    assert!(!report.has_failures());
    match &report.outcome(AddressFamily::V4).unwrap().status {
        FamilyStatus::Skipped { reason } => assert_eq!(*reason, SkipReason::NoCandidates),
        other => panic!("expected Skipped, got {:?}", other),
    }
}

#[tokio::test]
async fn wrong_family_candidates_never_submit() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new().answer(AddressFamily::V6, vec!["203.0.113.5"]);
    let config = RunConfig::new("Z1").with_ipv6("home6.example.com");

    let (engine, _) = engine_with(discoverer, provider.clone(), config);
    let report = engine.reconcile().await;

    assert_eq!(provider.upsert_calls(), 0);
    match &report.outcome(AddressFamily::V6).unwrap().status {
        FamilyStatus::Skipped {
            reason: SkipReason::NoUsableCandidate(candidates),
        } => assert_eq!(candidates, &vec!["203.0.113.5".to_string()]),
        other => panic!("expected NoUsableCandidate, got {:?}", other),
    }
}

#[tokio::test]
async fn discovery_error_skips_only_that_family() {
    let provider = FakeProvider::new();
    let discoverer = StubDiscoverer::new()
        .fail(AddressFamily::V4, "i/o timeout")
        .answer(AddressFamily::V6, vec!["2001:db8::5"]);

    let (engine, _) = engine_with(discoverer, provider.clone(), dual_stack_config());
    let report = engine.reconcile().await;

    assert!(!report.has_failures());
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.updated_count(), 1);
    assert!(matches!(
        &report.outcome(AddressFamily::V4).unwrap().status,
        FamilyStatus::Skipped {
            reason: SkipReason::DiscoveryFailed(msg)
        } if msg.contains("i/o timeout")
    ));
    assert_eq!(provider.upsert_calls(), 1);
    assert_eq!(provider.value("Z1", "home.example.com", RecordType::A), None);
}

#[tokio::test]
async fn submission_failure_does_not_suppress_other_family() {
    let provider = FakeProvider::new().failing_for(RecordType::A);
    let discoverer = StubDiscoverer::new()
        .answer(AddressFamily::V4, vec!["203.0.113.5"])
        .answer(AddressFamily::V6, vec!["2001:db8::5"]);

    let (engine, _) = engine_with(discoverer, provider.clone(), dual_stack_config());
    let report = engine.reconcile().await;

    assert!(report.has_failures());
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.updated_count(), 1);

    match &report.outcome(AddressFamily::V4).unwrap().status {
        FamilyStatus::Failed { value, error } => {
            assert_eq!(value.to_string(), "203.0.113.5");
            assert!(matches!(error, Error::Rejected(_)));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(report.outcome(AddressFamily::V6).unwrap().is_updated());
    assert_eq!(
        provider.value("Z1", "home6.example.com", RecordType::Aaaa),
        Some("2001:db8::5".to_string())
    );
}
