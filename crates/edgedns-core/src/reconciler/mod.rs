//! DNS record reconciliation
//!
//! The [`DnsReconciler`] converges the provider's A records for one name onto
//! a [`ResolvedIpSet`] using one of two strategies:
//!
//! - **Positional**: pair existing records with addresses by index and
//!   update `content` only, carrying each record's ttl and proxied flag.
//!   Never creates or deletes.
//! - **Recreate**: delete every existing record (best-effort), then create
//!   one record per address.
//!
//! ## Flow
//!
//! 1. Fetch the current snapshot (fresh every run, never cached)
//! 2. Build a [`ReconciliationPlan`] from snapshot + resolved set (pure)
//! 3. Execute the plan strictly in order, one provider call per step
//! 4. Record an [`OperationResult`] per call; a failed call never stops
//!    the remaining steps

mod plan;

pub use plan::{CreatePolicy, PlannedOp, ReconciliationPlan};

use tracing::{debug, error, info, warn};

use crate::config::{ReconcileStrategy, RecordConfig};
use crate::error::Result;
use crate::ip::ResolvedIpSet;
use crate::report::{OperationKind, OperationResult, RunOutcome};
use crate::traits::DnsProvider;

/// Converges one record name onto the resolved address set
pub struct DnsReconciler {
    /// DNS provider for reading and mutating records
    provider: Box<dyn DnsProvider>,

    /// Fully qualified record name
    record_name: String,

    strategy: ReconcileStrategy,

    /// Attributes for records created by the recreate strategy
    policy: CreatePolicy,
}

impl DnsReconciler {
    /// Create a reconciler for the record described by `record`
    pub fn new(provider: Box<dyn DnsProvider>, record: &RecordConfig) -> Result<Self> {
        record.validate()?;

        Ok(Self {
            provider,
            record_name: record.name.clone(),
            strategy: record.strategy,
            policy: CreatePolicy {
                ttl: record.ttl,
                proxied: record.proxied,
                max_records: record.max_records,
            },
        })
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    pub fn strategy(&self) -> ReconcileStrategy {
        self.strategy
    }

    /// Run one reconciliation pass
    ///
    /// Never returns `RunOutcome::SourceUnavailable`; that outcome belongs to
    /// the caller, which must not call this without a resolved set.
    pub async fn reconcile(&self, resolved: ResolvedIpSet) -> RunOutcome {
        let snapshot = match self.provider.list_records(&self.record_name).await {
            Ok(records) => records,
            Err(e) => {
                error!(
                    "Failed to list A records for {} via {}: {}",
                    self.record_name,
                    self.provider.provider_name(),
                    e
                );
                return RunOutcome::SnapshotUnavailable {
                    resolved,
                    reason: e.to_string(),
                };
            }
        };

        info!(
            "Found {} existing A record(s) for {}",
            snapshot.len(),
            self.record_name
        );

        let plan = match self.strategy {
            ReconcileStrategy::Positional => {
                if snapshot.is_empty() {
                    warn!(
                        "No existing A records for {}; positional strategy has nothing to update",
                        self.record_name
                    );
                    return RunOutcome::NothingToUpdate { resolved };
                }
                ReconciliationPlan::positional(&snapshot, &resolved)
            }
            ReconcileStrategy::Recreate => {
                ReconciliationPlan::recreate(&self.record_name, &snapshot, &resolved, &self.policy)
            }
        };

        debug!(
            "Plan for {} ({}): {} operation(s), {} unchanged",
            self.record_name,
            self.strategy,
            plan.len(),
            plan.unchanged()
        );

        let mut results = Vec::with_capacity(plan.len());
        for op in plan.ops() {
            results.push(self.execute(op).await);
        }

        RunOutcome::Reconciled {
            resolved,
            results,
            unchanged: plan.unchanged(),
        }
    }

    /// Issue the provider call for one planned step
    async fn execute(&self, op: &PlannedOp) -> OperationResult {
        match op {
            PlannedOp::Update { record, content } => {
                let desired = record.with_content(*content);
                match self.provider.update_record(&desired).await {
                    Ok(_) => {
                        info!(
                            "Updated {} record {}: {} -> {}",
                            self.record_name, record.id, record.content, content
                        );
                        OperationResult::succeeded(
                            OperationKind::Update,
                            Some(*content),
                            Some(record.id.clone()),
                            format!("{} -> {}", record.content, content),
                        )
                    }
                    Err(e) => {
                        warn!(
                            "Failed to update {} record {} to {}: {}",
                            self.record_name, record.id, content, e
                        );
                        OperationResult::failed(
                            OperationKind::Update,
                            Some(*content),
                            Some(record.id.clone()),
                            e.to_string(),
                        )
                    }
                }
            }
            PlannedOp::Delete { record } => {
                let ip = record.content.parse().ok();
                match self.provider.delete_record(&record.id).await {
                    Ok(()) => {
                        info!(
                            "Deleted {} record {} ({})",
                            self.record_name, record.id, record.content
                        );
                        OperationResult::succeeded(
                            OperationKind::Delete,
                            ip,
                            Some(record.id.clone()),
                            "deleted",
                        )
                    }
                    Err(e) => {
                        warn!(
                            "Failed to delete {} record {}: {}",
                            self.record_name, record.id, e
                        );
                        OperationResult::failed(
                            OperationKind::Delete,
                            ip,
                            Some(record.id.clone()),
                            e.to_string(),
                        )
                    }
                }
            }
            PlannedOp::Create { record } => match self.provider.create_record(record).await {
                Ok(created) => {
                    info!(
                        "Created {} -> {} (record {})",
                        self.record_name, record.content, created.id
                    );
                    OperationResult::succeeded(
                        OperationKind::Create,
                        Some(record.content),
                        None,
                        format!("created record {}", created.id),
                    )
                }
                Err(e) => {
                    warn!(
                        "Failed to create {} -> {}: {}",
                        self.record_name, record.content, e
                    );
                    OperationResult::failed(
                        OperationKind::Create,
                        Some(record.content),
                        None,
                        e.to_string(),
                    )
                }
            },
        }
    }
}
