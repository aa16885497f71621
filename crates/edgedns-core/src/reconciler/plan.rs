use std::net::Ipv4Addr;

use crate::ip::ResolvedIpSet;
use crate::traits::{DnsRecord, NewRecord};

/// Attributes for records the recreate strategy creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatePolicy {
    pub ttl: u32,
    pub proxied: bool,
    /// Cap on created records (None = one per resolved address)
    pub max_records: Option<usize>,
}

impl Default for CreatePolicy {
    /// Short TTL, DNS only: suits edge IPs that rotate every run
    fn default() -> Self {
        Self {
            ttl: 60,
            proxied: false,
            max_records: None,
        }
    }
}

/// One provider call the reconciler intends to make
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedOp {
    /// Point an existing record at `content`, keeping its other attributes
    Update { record: DnsRecord, content: Ipv4Addr },
    Delete { record: DnsRecord },
    Create { record: NewRecord },
}

/// Ordered provider calls for one run, derived from a snapshot
///
/// Built without I/O and discarded after execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    ops: Vec<PlannedOp>,
    unchanged: usize,
}

impl ReconciliationPlan {
    /// Pair records and addresses index-for-index
    ///
    /// Only `min(records, ips)` pairs are considered: surplus records are
    /// left alone and surplus addresses are dropped. A pair whose record
    /// already holds the address produces no call.
    pub fn positional(snapshot: &[DnsRecord], resolved: &ResolvedIpSet) -> Self {
        let mut plan = Self::default();
        for (record, ip) in snapshot.iter().zip(resolved.iter()) {
            if record.content.parse::<Ipv4Addr>().ok() == Some(*ip) {
                plan.unchanged += 1;
                continue;
            }
            plan.ops.push(PlannedOp::Update {
                record: record.clone(),
                content: *ip,
            });
        }
        plan
    }

    /// Delete every record in the snapshot, then create one per address
    ///
    /// All deletes precede all creates. Creates do not depend on deletes
    /// succeeding.
    pub fn recreate(
        name: &str,
        snapshot: &[DnsRecord],
        resolved: &ResolvedIpSet,
        policy: &CreatePolicy,
    ) -> Self {
        let deletes = snapshot.iter().map(|record| PlannedOp::Delete {
            record: record.clone(),
        });

        let limit = policy.max_records.unwrap_or(usize::MAX);
        let creates = resolved.iter().take(limit).map(|ip| PlannedOp::Create {
            record: NewRecord {
                name: name.to_string(),
                content: *ip,
                ttl: policy.ttl,
                proxied: policy.proxied,
            },
        });

        Self {
            ops: deletes.chain(creates).collect(),
            unchanged: 0,
        }
    }

    pub fn ops(&self) -> &[PlannedOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Positional pairs skipped because they already matched
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::IpOrigin;

    fn record(id: &str, content: &str, ttl: u32, proxied: bool) -> DnsRecord {
        DnsRecord {
            id: id.to_string(),
            name: "edge.example.com".to_string(),
            record_type: "A".to_string(),
            content: content.to_string(),
            ttl,
            proxied,
        }
    }

    fn resolved(ips: &[&str]) -> ResolvedIpSet {
        ResolvedIpSet::from_candidates(ips.iter().copied(), IpOrigin::Fallback, None)
    }

    #[test]
    fn positional_pairs_by_index_and_drops_surplus_ips() {
        let snapshot = vec![
            record("a", "10.0.0.1", 300, true),
            record("b", "10.0.0.2", 120, false),
        ];
        let plan = ReconciliationPlan::positional(
            &snapshot,
            &resolved(&["1.1.1.1", "2.2.2.2", "3.3.3.3"]),
        );

        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.ops()[0],
            PlannedOp::Update {
                record: snapshot[0].clone(),
                content: "1.1.1.1".parse().unwrap(),
            }
        );
        assert!(matches!(&plan.ops()[1], PlannedOp::Update { record, .. } if record.id == "b"));
    }

    #[test]
    fn positional_leaves_surplus_records_alone() {
        let snapshot = vec![
            record("a", "10.0.0.1", 300, true),
            record("b", "10.0.0.2", 120, false),
            record("c", "10.0.0.3", 60, false),
        ];
        let plan = ReconciliationPlan::positional(&snapshot, &resolved(&["1.1.1.1"]));
        assert_eq!(plan.len(), 1);
        assert!(matches!(&plan.ops()[0], PlannedOp::Update { record, .. } if record.id == "a"));
    }

    #[test]
    fn positional_skips_records_already_pointing_at_target() {
        let snapshot = vec![
            record("a", "1.1.1.1", 300, true),
            record("b", "10.0.0.2", 120, false),
        ];
        let plan = ReconciliationPlan::positional(&snapshot, &resolved(&["1.1.1.1", "2.2.2.2"]));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.unchanged(), 1);
    }

    #[test]
    fn recreate_deletes_everything_before_creating() {
        let snapshot = vec![record("a", "10.0.0.1", 300, true), record("b", "10.0.0.2", 1, true)];
        let plan = ReconciliationPlan::recreate(
            "edge.example.com",
            &snapshot,
            &resolved(&["1.1.1.1", "2.2.2.2", "3.3.3.3"]),
            &CreatePolicy::default(),
        );

        let kinds: Vec<&str> = plan
            .ops()
            .iter()
            .map(|op| match op {
                PlannedOp::Delete { .. } => "delete",
                PlannedOp::Create { .. } => "create",
                PlannedOp::Update { .. } => "update",
            })
            .collect();
        assert_eq!(kinds, ["delete", "delete", "create", "create", "create"]);

        let PlannedOp::Create { record } = &plan.ops()[2] else {
            panic!("expected create");
        };
        assert_eq!(record.ttl, 60);
        assert!(!record.proxied);
        assert_eq!(record.name, "edge.example.com");
    }

    #[test]
    fn recreate_honors_max_records() {
        let policy = CreatePolicy {
            max_records: Some(2),
            ..CreatePolicy::default()
        };
        let plan = ReconciliationPlan::recreate(
            "edge.example.com",
            &[],
            &resolved(&["1.1.1.1", "2.2.2.2", "3.3.3.3"]),
            &policy,
        );
        assert_eq!(plan.len(), 2);
    }
}
