//! Per-operation results and the per-run report
//!
//! A run always ends in a [`RunReport`], including runs that stopped early,
//! so the notification path always has something descriptive to send.

use chrono::{DateTime, Utc};
use std::fmt;
use std::fmt::Write as _;
use std::net::Ipv4Addr;

use crate::ip::ResolvedIpSet;
use crate::resolver::FetchFailure;

/// Kind of provider mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        })
    }
}

/// Outcome of one attempted provider call
///
/// Appended to the run's result list in the order calls were issued and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub kind: OperationKind,
    /// Address the call was about, if any
    pub ip: Option<Ipv4Addr>,
    /// Record the call targeted, if it existed before the call
    pub record_id: Option<String>,
    pub success: bool,
    /// Human-readable cause or confirmation
    pub detail: String,
}

impl OperationResult {
    pub fn succeeded(
        kind: OperationKind,
        ip: Option<Ipv4Addr>,
        record_id: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            ip,
            record_id,
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failed(
        kind: OperationKind,
        ip: Option<Ipv4Addr>,
        record_id: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            ip,
            record_id,
            success: false,
            detail: detail.into(),
        }
    }

    /// `1.2.3.4`, `record abc`, or `1.2.3.4 (record abc)`
    pub fn target(&self) -> String {
        match (&self.ip, &self.record_id) {
            (Some(ip), Some(id)) => format!("{} (record {})", ip, id),
            (Some(ip), None) => ip.to_string(),
            (None, Some(id)) => format!("record {}", id),
            (None, None) => "-".to_string(),
        }
    }
}

/// Run-level result
///
/// None of these is an error: run-level failures end the run early with an
/// explanation instead of raising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every source and retry failed and no fallback was usable
    SourceUnavailable { failures: Vec<FetchFailure> },

    /// Listing current records failed; nothing was mutated
    SnapshotUnavailable {
        resolved: ResolvedIpSet,
        reason: String,
    },

    /// Positional strategy found no existing records to update
    NothingToUpdate { resolved: ResolvedIpSet },

    /// The plan was executed (possibly with per-record failures)
    Reconciled {
        resolved: ResolvedIpSet,
        results: Vec<OperationResult>,
        /// Pairs that already had the target content
        unchanged: usize,
    },
}

impl RunOutcome {
    /// Results of every attempted provider call (empty for early exits)
    pub fn results(&self) -> &[OperationResult] {
        match self {
            RunOutcome::Reconciled { results, .. } => results,
            _ => &[],
        }
    }

    pub fn resolved(&self) -> Option<&ResolvedIpSet> {
        match self {
            RunOutcome::SourceUnavailable { .. } => None,
            RunOutcome::SnapshotUnavailable { resolved, .. }
            | RunOutcome::NothingToUpdate { resolved }
            | RunOutcome::Reconciled { resolved, .. } => Some(resolved),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.results().iter().filter(|r| !r.success).count()
    }

    /// One-line description for logs and message headings
    pub fn headline(&self) -> String {
        match self {
            RunOutcome::SourceUnavailable { failures } => format!(
                "No edge IPs could be resolved ({} failed fetches); DNS left untouched",
                failures.len()
            ),
            RunOutcome::SnapshotUnavailable { reason, .. } => {
                format!("Could not read current DNS records ({}); DNS left untouched", reason)
            }
            RunOutcome::NothingToUpdate { .. } => {
                "No existing A records to update; create them first or use the recreate strategy"
                    .to_string()
            }
            RunOutcome::Reconciled { results, unchanged, .. } => {
                let failed = self.failure_count();
                format!(
                    "DNS update finished: {} succeeded, {} failed, {} unchanged",
                    results.len() - failed,
                    failed,
                    unchanged
                )
            }
        }
    }
}

/// Summary of one engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub record_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Render the report as markdown for the notification channel
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "**{}**\n", self.outcome.headline());
        let _ = writeln!(out, "Record: `{}`\n", self.record_name);
        if let Some(resolved) = self.outcome.resolved() {
            let _ = writeln!(
                out,
                "Source: {} ({} addresses)\n",
                resolved.origin(),
                resolved.len()
            );
        }

        match &self.outcome {
            RunOutcome::SourceUnavailable { failures } => {
                let _ = writeln!(out, "**Fetch failures:**");
                for failure in failures {
                    let _ = writeln!(out, "- {}", failure);
                }
            }
            RunOutcome::Reconciled { results, .. } if !results.is_empty() => {
                let _ = writeln!(out, "**Operations:**");
                for result in results {
                    let status = if result.success {
                        "[ok]".to_string()
                    } else {
                        format!("[failed: {}]", result.detail)
                    };
                    let _ = writeln!(out, "- {} {} {}", result.kind, result.target(), status);
                }
            }
            _ => {}
        }

        let _ = write!(
            out,
            "\n_{} UTC_",
            self.finished_at.format("%Y-%m-%d %H:%M:%S")
        );
        out
    }
}
