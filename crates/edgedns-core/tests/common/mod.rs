//! Test doubles and common utilities for contract tests
//!
//! These doubles record every call so tests can assert on exactly which
//! provider mutations happened, in which order.

#![allow(dead_code)]

use edgedns_core::error::{Error, Result};
use edgedns_core::traits::{DnsProvider, DnsRecord, IpFeed, NewRecord, Notifier};
use edgedns_core::{EdgeDnsConfig, ProviderConfig, RecordConfig, SourceConfig};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const RECORD_NAME: &str = "edge.example.com";
pub const FEED_URL: &str = "https://feed.example/ips";

/// One scripted response from [`ScriptedFeed`]
#[derive(Clone)]
pub enum Reply {
    Body(String),
    Fail(String),
    /// Never answers; trips the resolver's timeout
    Hang,
}

/// A feed that replays a fixed script per URL
///
/// Once a URL's script is exhausted its last reply repeats. Unknown URLs fail.
#[derive(Clone, Default)]
pub struct ScriptedFeed {
    scripts: Arc<Mutex<HashMap<String, Vec<Reply>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, replies: Vec<Reply>) -> Self {
        self.scripts.lock().unwrap().insert(url.to_string(), replies);
        self
    }

    /// Convenience: one URL that always serves `body`
    pub fn serving(body: &str) -> Self {
        Self::new().with(FEED_URL, vec![Reply::Body(body.to_string())])
    }

    /// URLs fetched so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IpFeed for ScriptedFeed {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(url) {
                Some(replies) if replies.len() > 1 => Some(replies.remove(0)),
                Some(replies) => replies.first().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(msg)) => Err(Error::http(msg)),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::timeout("hung"))
            }
            None => Err(Error::http("connection refused")),
        }
    }

    fn feed_name(&self) -> &'static str {
        "scripted"
    }
}

/// Which provider call a failure applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    List,
    Create(String),
    Update(String),
    Delete(String),
}

/// In-memory provider zone with per-call failure injection
///
/// Clones share state, so a test keeps one handle while the engine owns
/// another.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    records: Arc<Mutex<Vec<DnsRecord>>>,
    failures: Arc<Mutex<HashSet<Call>>>,
    log: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<AtomicUsize>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with records `rec-0 .. rec-n` holding `contents`
    pub fn with_records(contents: &[(&str, u32, bool)]) -> Self {
        let provider = Self::new();
        {
            let mut records = provider.records.lock().unwrap();
            for (i, (content, ttl, proxied)) in contents.iter().enumerate() {
                records.push(DnsRecord {
                    id: format!("rec-{}", i),
                    name: RECORD_NAME.to_string(),
                    record_type: "A".to_string(),
                    content: content.to_string(),
                    ttl: *ttl,
                    proxied: *proxied,
                });
            }
        }
        provider.next_id.store(contents.len(), Ordering::SeqCst);
        provider
    }

    /// Make `call` fail with an HTTP 500 every time
    pub fn fail_on(self, call: Call) -> Self {
        self.failures.lock().unwrap().insert(call);
        self
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn contents(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.content).collect()
    }

    /// Every call made, in order
    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    /// Calls other than listing
    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| **c != Call::List).count()
    }

    fn check(&self, call: Call) -> Result<()> {
        self.log.lock().unwrap().push(call.clone());
        if self.failures.lock().unwrap().contains(&call) {
            return Err(Error::provider("memory", "HTTP 500 Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for InMemoryProvider {
    async fn list_records(&self, name: &str) -> Result<Vec<DnsRecord>> {
        self.check(Call::List)?;
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.name == name)
            .collect())
    }

    async fn create_record(&self, record: &NewRecord) -> Result<DnsRecord> {
        self.check(Call::Create(record.content.to_string()))?;
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = DnsRecord {
            id,
            name: record.name.clone(),
            record_type: "A".to_string(),
            content: record.content.to_string(),
            ttl: record.ttl,
            proxied: record.proxied,
        };
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_record(&self, record: &DnsRecord) -> Result<DnsRecord> {
        self.check(Call::Update(record.id.clone()))?;
        let mut records = self.records.lock().unwrap();
        let existing = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| Error::not_found(record.id.clone()))?;
        *existing = record.clone();
        Ok(record.clone())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.check(Call::Delete(record_id.to_string()))?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::not_found(record_id.to_string()));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// A notifier that stores every message, optionally failing each send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, title: &str, content: &str) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), content.to_string()));
        if self.fail {
            return Err(Error::notifier("pushplus returned code 999"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// Source settings with no backoff and a single URL
pub fn fast_source(urls: &[&str]) -> SourceConfig {
    SourceConfig {
        urls: urls.iter().map(|u| u.to_string()).collect(),
        max_retries: 2,
        retry_delay_secs: 0,
        ..SourceConfig::default()
    }
}

/// Minimal valid configuration for the test record
pub fn minimal_config(record: RecordConfig) -> EdgeDnsConfig {
    let mut config = EdgeDnsConfig::new(
        ProviderConfig::Cloudflare {
            api_token: "test-token".to_string(),
            zone_id: "test-zone".to_string(),
            dry_run: false,
        },
        record,
    );
    config.source = fast_source(&[FEED_URL]);
    config
}
