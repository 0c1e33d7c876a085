//! Test doubles and common utilities for contract tests
//!
//! These doubles stand in for the network: a scripted discoverer and a fake
//! provider that keeps the latest value per (zone, name, type).

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{
    AddressDiscoverer, AddressFamily, ChangeReceipt, DnsProvider, RecordChangeRequest, RecordType,
    ResolvedAddress,
};
use ddns_core::{DdnsEngine, RecordReconciler, RunConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub discoverer answers for one family
#[derive(Debug, Clone)]
pub enum Scripted {
    Candidates(Vec<&'static str>),
    Fail(&'static str),
}

/// An AddressDiscoverer with scripted answers per family
pub struct StubDiscoverer {
    answers: HashMap<AddressFamily, Scripted>,
    calls: Arc<Mutex<Vec<(AddressFamily, Duration)>>>,
}

impl StubDiscoverer {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answer(mut self, family: AddressFamily, candidates: Vec<&'static str>) -> Self {
        self.answers.insert(family, Scripted::Candidates(candidates));
        self
    }

    pub fn fail(mut self, family: AddressFamily, message: &'static str) -> Self {
        self.answers.insert(family, Scripted::Fail(message));
        self
    }

    /// Families queried so far, with the timeout that was passed
    pub fn calls(&self) -> Vec<(AddressFamily, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AddressDiscoverer for StubDiscoverer {
    async fn discover(&self, family: AddressFamily, timeout: Duration) -> Result<ResolvedAddress> {
        self.calls.lock().unwrap().push((family, timeout));

        match self.answers.get(&family) {
            Some(Scripted::Candidates(candidates)) => Ok(ResolvedAddress::new(
                family,
                candidates.iter().map(|c| c.to_string()).collect(),
            )),
            Some(Scripted::Fail(message)) => Err(Error::discovery(*message)),
            None => Ok(ResolvedAddress::empty(family)),
        }
    }

    fn discoverer_name(&self) -> &'static str {
        "stub"
    }
}

type RecordKey = (String, String, RecordType);

/// A fake provider that records the latest value per (zone, name, type)
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
#[derive(Clone, Default)]
pub struct FakeProvider {
    records: Arc<Mutex<HashMap<RecordKey, String>>>,
    submitted: Arc<Mutex<Vec<RecordChangeRequest>>>,
    upsert_calls: Arc<AtomicUsize>,
    fail_types: Arc<Mutex<Vec<RecordType>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every upsert of `record_type`
    pub fn failing_for(self, record_type: RecordType) -> Self {
        self.fail_types.lock().unwrap().push(record_type);
        self
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<RecordChangeRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn value(&self, zone: &str, name: &str, record_type: RecordType) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&(zone.to_string(), name.to_string(), record_type))
            .cloned()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for FakeProvider {
    async fn upsert(&self, request: &RecordChangeRequest) -> Result<ChangeReceipt> {
        let call = self.upsert_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.submitted.lock().unwrap().push(request.clone());

        if self.fail_types.lock().unwrap().contains(&request.record_type) {
            return Err(Error::rejected(format!(
                "Invalid resource record set for {}",
                request.record_name
            )));
        }

        self.records.lock().unwrap().insert(
            (
                request.hosted_zone_id.clone(),
                request.record_name.clone(),
                request.record_type,
            ),
            request.record_value.clone(),
        );

        Ok(ChangeReceipt {
            change_id: format!("/change/C{}", call),
            status: "PENDING".to_string(),
            submitted_at: None,
            dry_run: false,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Engine over a stub discoverer and a fake provider
pub fn engine_with(
    discoverer: StubDiscoverer,
    provider: FakeProvider,
    config: RunConfig,
) -> (DdnsEngine, Arc<StubDiscoverer>) {
    let discoverer = Arc::new(discoverer);
    let reconciler = RecordReconciler::new(Box::new(provider), config.submission_timeout);
    let engine = DdnsEngine::new(discoverer.clone(), reconciler, config)
        .expect("engine construction succeeds");
    (engine, discoverer)
}

/// Dual-stack configuration used across tests
pub fn dual_stack_config() -> RunConfig {
    RunConfig::new("Z1")
        .with_ipv4("home.example.com")
        .with_ipv6("home6.example.com")
}
