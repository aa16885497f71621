// # DNS Provider Trait
//
// Defines the interface for reading and mutating A records via provider APIs.
//
// ## Implementations
//
// - Cloudflare: `edgedns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use edgedns_core::DnsProvider;
//
// let records = provider.list_records("edge.example.com").await?;
// for record in records {
//     provider.delete_record(&record.id).await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// The only record type this system manages
pub const RECORD_TYPE_A: &str = "A";

/// One A record as the provider reports it
///
/// The engine only ever holds a read snapshot of these. After any mutating
/// call the snapshot is stale and must be re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier (opaque)
    pub id: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type, always "A" here
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content (an IPv4 address in textual form)
    pub content: String,
    /// Time-to-live in seconds (1 = provider "automatic")
    pub ttl: u32,
    /// Whether traffic is proxied through the provider's edge
    #[serde(default)]
    pub proxied: bool,
}

impl DnsRecord {
    /// Copy of this record pointing at `ip`, all other attributes preserved
    pub fn with_content(&self, ip: Ipv4Addr) -> Self {
        Self {
            content: ip.to_string(),
            ..self.clone()
        }
    }
}

/// Payload for creating an A record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub content: Ipv4Addr,
    pub ttl: u32,
    pub proxied: bool,
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// Providers are isolated and single-shot:
/// - One API exchange per method call (listing may follow pagination)
/// - No retry, no backoff, no caching beyond a single request
/// - A non-2xx status or a `success = false` payload is an `Err`
///
/// Planning and failure isolation are owned by
/// [`DnsReconciler`](crate::reconciler::DnsReconciler).
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every A record whose name equals `name`
    async fn list_records(&self, name: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create an A record
    ///
    /// # Returns
    ///
    /// The record as created by the provider (with its assigned id)
    async fn create_record(&self, record: &NewRecord) -> Result<DnsRecord, crate::Error>;

    /// Overwrite an existing record by id
    ///
    /// Every field of `record` is sent, so ttl and proxied are carried
    /// exactly as given rather than reset to provider defaults.
    async fn update_record(&self, record: &DnsRecord) -> Result<DnsRecord, crate::Error>;

    /// Delete a record by id
    async fn delete_record(&self, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "cloudflare")
    fn provider_name(&self) -> &'static str;
}
