// # edgedns-core
//
// Core library for keeping a DNS name pointed at a rotating set of
// Cloudflare edge IPv4 addresses.
//
// ## Architecture Overview
//
// - **IpFeed**: Trait for fetching the raw upstream candidate-IP payload
// - **DnsProvider**: Trait for listing and mutating A records via a provider API
// - **Notifier**: Trait for delivering the run summary to an operator
// - **IpSourceResolver**: Turns an unreliable feed into a `ResolvedIpSet`
// - **DnsReconciler**: Converges the provider's A records onto a `ResolvedIpSet`
// - **EdgeDnsEngine**: Orchestrates resolve → reconcile → notify for each run
//
// ## Design Principles
//
// 1. **Policy in the core**: Retry, fallback, limits and planning live here;
//    collaborator crates make exactly one API call per trait method
// 2. **Explicit results**: Per-attempt and per-record failures are values,
//    never control flow
// 3. **Stateless runs**: Every run re-fetches the provider snapshot
// 4. **Library-First**: Everything the daemon does is available as a library

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod ip;
pub mod reconciler;
pub mod report;
pub mod resolver;
pub mod traits;

// Re-export core types for convenience
pub use config::{
    EdgeDnsConfig, EngineConfig, NotifierConfig, ProviderConfig, ReconcileStrategy, RecordConfig,
    SourceConfig,
};
pub use engine::{EdgeDnsEngine, EngineEvent};
pub use error::{Error, Result};
pub use ip::{IpOrigin, ResolvedIpSet};
pub use reconciler::{DnsReconciler, ReconciliationPlan};
pub use report::{OperationKind, OperationResult, RunOutcome, RunReport};
pub use resolver::{FetchFailure, FailureReason, IpSourceResolver, Resolution};
pub use traits::{DnsProvider, DnsRecord, IpFeed, NewRecord, Notifier};
