//! Contract Test: Delete and Recreate
//!
//! The recreate strategy clears the name, then creates one record per
//! resolved address.
//!
//! Constraints verified:
//! - Every delete is issued before any create
//! - Creates happen regardless of delete failures
//! - One failed call yields one failed result and N-1 others
//! - Created records carry the configured ttl and proxied flag
//! - A failed snapshot listing means zero mutations

mod common;

use common::*;
use edgedns_core::{
    DnsReconciler, IpOrigin, OperationKind, RecordConfig, ResolvedIpSet, RunOutcome,
};

const IPS: [&str; 5] = ["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4", "5.5.5.5"];

fn resolved(ips: &[&str]) -> ResolvedIpSet {
    ResolvedIpSet::from_candidates(ips.iter().copied(), IpOrigin::Fallback, None)
}

fn three_records() -> InMemoryProvider {
    InMemoryProvider::with_records(&[
        ("10.0.0.1", 300, true),
        ("10.0.0.2", 300, true),
        ("10.0.0.3", 300, true),
    ])
}

#[tokio::test]
async fn three_records_five_ips_ends_with_five() {
    let provider = three_records();
    let reconciler =
        DnsReconciler::new(Box::new(provider.clone()), &RecordConfig::new(RECORD_NAME)).unwrap();

    let outcome = reconciler.reconcile(resolved(&IPS)).await;

    assert_eq!(outcome.results().len(), 8);
    assert_eq!(outcome.failure_count(), 0);

    let records = provider.records();
    assert_eq!(records.len(), 5);
    assert_eq!(provider.contents(), IPS);
    assert!(records.iter().all(|r| r.ttl == 60 && !r.proxied));
}

#[tokio::test]
async fn deletes_precede_creates() {
    let provider = three_records();
    let reconciler =
        DnsReconciler::new(Box::new(provider.clone()), &RecordConfig::new(RECORD_NAME)).unwrap();

    reconciler.reconcile(resolved(&IPS)).await;

    let calls = provider.calls();
    assert_eq!(calls[0], Call::List);
    let last_delete = calls
        .iter()
        .rposition(|c| matches!(c, Call::Delete(_)))
        .unwrap();
    let first_create = calls
        .iter()
        .position(|c| matches!(c, Call::Create(_)))
        .unwrap();
    assert!(last_delete < first_create);
}

#[tokio::test]
async fn delete_failures_do_not_block_creates() {
    let provider = three_records()
        .fail_on(Call::Delete("rec-0".to_string()))
        .fail_on(Call::Delete("rec-2".to_string()));
    let reconciler =
        DnsReconciler::new(Box::new(provider.clone()), &RecordConfig::new(RECORD_NAME)).unwrap();

    let outcome = reconciler.reconcile(resolved(&IPS)).await;

    assert_eq!(outcome.failure_count(), 2);
    let created: Vec<_> = provider
        .records()
        .into_iter()
        .filter(|r| IPS.contains(&r.content.as_str()))
        .collect();
    assert_eq!(created.len(), 5);
}

#[tokio::test]
async fn single_server_error_is_isolated() {
    let provider = three_records().fail_on(Call::Create("3.3.3.3".to_string()));
    let reconciler =
        DnsReconciler::new(Box::new(provider.clone()), &RecordConfig::new(RECORD_NAME)).unwrap();

    let outcome = reconciler.reconcile(resolved(&IPS)).await;
    let results = outcome.results();

    assert_eq!(results.len(), 8);
    let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].kind, OperationKind::Create);
    assert_eq!(failed[0].ip, Some("3.3.3.3".parse().unwrap()));
    assert_eq!(provider.contents(), vec!["1.1.1.1", "2.2.2.2", "4.4.4.4", "5.5.5.5"]);
}

#[tokio::test]
async fn max_records_caps_creates() {
    let provider = three_records();
    let record = RecordConfig::new(RECORD_NAME).with_max_records(2);
    let reconciler = DnsReconciler::new(Box::new(provider.clone()), &record).unwrap();

    reconciler.reconcile(resolved(&IPS)).await;

    assert_eq!(provider.contents(), vec!["1.1.1.1", "2.2.2.2"]);
}

#[tokio::test]
async fn snapshot_failure_mutates_nothing() {
    let provider = three_records().fail_on(Call::List);
    let reconciler =
        DnsReconciler::new(Box::new(provider.clone()), &RecordConfig::new(RECORD_NAME)).unwrap();

    let outcome = reconciler.reconcile(resolved(&IPS)).await;

    assert!(matches!(outcome, RunOutcome::SnapshotUnavailable { .. }));
    assert_eq!(provider.mutation_count(), 0);
    assert_eq!(provider.records().len(), 3);
}
