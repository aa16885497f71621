//! Core traits for the edgedns system
//!
//! This module defines the abstract interfaces that collaborator crates implement.
//!
//! - [`IpFeed`]: Fetch the raw upstream candidate-IP payload
//! - [`DnsProvider`]: List and mutate A records via a provider API
//! - [`Notifier`]: Deliver the run summary to an operator

pub mod dns_provider;
pub mod ip_feed;
pub mod notifier;

pub use dns_provider::{DnsProvider, DnsRecord, NewRecord, RECORD_TYPE_A};
pub use ip_feed::IpFeed;
pub use notifier::Notifier;
