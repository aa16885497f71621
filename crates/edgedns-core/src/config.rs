//! Configuration types for the edgedns system
//!
//! One [`EdgeDnsConfig`] is built at startup and handed to the components;
//! nothing reads configuration from the process environment after that.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ip::parse_candidate;

/// Feed that served the HTML results widget when this tool was written
pub const DEFAULT_SOURCE_URL: &str = "https://stock.hostmonit.com/CloudFlareYes";

/// Main edgedns configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDnsConfig {
    /// Upstream candidate-IP source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// The record being reconciled
    pub record: RecordConfig,

    /// Notification channel (None = disabled)
    #[serde(default)]
    pub notifier: Option<NotifierConfig>,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl EdgeDnsConfig {
    /// Create a configuration with defaults for everything optional
    pub fn new(provider: ProviderConfig, record: RecordConfig) -> Self {
        Self {
            source: SourceConfig::default(),
            provider,
            record,
            notifier: None,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.provider.validate()?;
        self.record.validate()?;
        if let Some(notifier) = &self.notifier {
            notifier.validate()?;
        }
        self.engine.validate()?;
        Ok(())
    }
}

/// Upstream source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Feed URLs, tried in order within each attempt
    #[serde(default = "default_source_urls")]
    pub urls: Vec<String>,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of passes over all URLs before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Fixed pause between failed passes (in seconds)
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Static addresses used when every pass fails
    #[serde(default)]
    pub fallback_ips: Vec<String>,

    /// Maximum number of resolved addresses (None = unrestricted)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,

    /// Whether `limit` also caps the fallback list
    #[serde(default)]
    pub limit_applies_to_fallback: bool,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.urls.is_empty() {
            return Err(crate::Error::config("At least one source URL is required"));
        }
        for url in &self.urls {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "Source URL must use HTTP or HTTPS scheme: {}",
                    url
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Source timeout must be > 0"));
        }
        if self.max_retries == 0 {
            return Err(crate::Error::config("Source max_retries must be >= 1"));
        }
        if self.limit == Some(0) {
            return Err(crate::Error::config(
                "Source limit must be > 0 (omit it for no limit)",
            ));
        }
        if let Some(bad) = self
            .fallback_ips
            .iter()
            .find(|ip| parse_candidate(ip.trim()).is_none())
        {
            return Err(crate::Error::config(format!(
                "Fallback entry is not an IPv4 address: {}",
                bad
            )));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            urls: default_source_urls(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            fallback_ips: Vec::new(),
            limit: default_limit(),
            limit_applies_to_fallback: false,
        }
    }
}

fn default_source_urls() -> Vec<String> {
    vec![DEFAULT_SOURCE_URL.to_string()]
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    5
}

fn default_retry_delay_secs() -> u64 {
    2
}

fn default_limit() -> Option<usize> {
    Some(20)
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// Zone ID holding the record
        zone_id: String,
        /// Log mutations instead of sending them
        #[serde(default)]
        dry_run: bool,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare {
                api_token, zone_id, ..
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                if zone_id.is_empty() {
                    return Err(crate::Error::config("Cloudflare zone ID cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Cloudflare { zone_id, dry_run, .. } => f
                .debug_struct("Cloudflare")
                .field("api_token", &"<REDACTED>")
                .field("zone_id", zone_id)
                .field("dry_run", dry_run)
                .finish(),
        }
    }
}

/// How the reconciler converges records onto the resolved set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Pair existing records with addresses by position and update content only
    Positional,
    /// Delete every existing record, then create one per address
    #[default]
    Recreate,
}

impl std::str::FromStr for ReconcileStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positional" | "update" => Ok(ReconcileStrategy::Positional),
            "recreate" | "delete-recreate" | "delete_recreate" => Ok(ReconcileStrategy::Recreate),
            other => Err(crate::Error::config(format!(
                "Unknown reconcile strategy '{}'. Valid: positional, recreate",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReconcileStrategy::Positional => "positional",
            ReconcileStrategy::Recreate => "recreate",
        })
    }
}

/// DNS record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// DNS record name (e.g., "edge.example.com")
    pub name: String,

    /// Reconciliation strategy
    #[serde(default)]
    pub strategy: ReconcileStrategy,

    /// TTL for records created by the recreate strategy
    #[serde(default = "default_record_ttl")]
    pub ttl: u32,

    /// Proxy flag for records created by the recreate strategy
    #[serde(default)]
    pub proxied: bool,

    /// Cap on records created by the recreate strategy
    #[serde(default)]
    pub max_records: Option<usize>,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategy: ReconcileStrategy::default(),
            ttl: default_record_ttl(),
            proxied: false,
            max_records: None,
        }
    }

    /// Set the reconcile strategy
    pub fn with_strategy(mut self, strategy: ReconcileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Cap the number of created records
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        if self.name.len() > 253 {
            return Err(crate::Error::config(format!(
                "Record name too long: {} chars (max 253)",
                self.name.len()
            )));
        }
        if self.ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0 (1 = automatic)"));
        }
        if self.max_records == Some(0) {
            return Err(crate::Error::config("max_records must be > 0"));
        }
        Ok(())
    }
}

fn default_record_ttl() -> u32 {
    60
}

/// Notification channel configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifierConfig {
    /// PushPlus (pushplus.plus)
    PushPlus {
        /// PushPlus user token
        token: String,
        /// Message title
        #[serde(default = "default_notify_title")]
        title: String,
    },
}

impl NotifierConfig {
    /// Validate the notifier configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            NotifierConfig::PushPlus { token, .. } => {
                if token.is_empty() {
                    return Err(crate::Error::config("PushPlus token cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Title used for every message
    pub fn title(&self) -> &str {
        match self {
            NotifierConfig::PushPlus { title, .. } => title,
        }
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifierConfig::PushPlus { title, .. } => f
                .debug_struct("PushPlus")
                .field("token", &"<REDACTED>")
                .field("title", title)
                .finish(),
        }
    }
}

pub fn default_notify_title() -> String {
    "Cloudflare edge IP update".to_string()
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Period between runs in interval mode (None = single run)
    #[serde(default)]
    pub interval_secs: Option<u64>,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == Some(0) {
            return Err(crate::Error::config("Run interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: None,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> EdgeDnsConfig {
        EdgeDnsConfig::new(
            ProviderConfig::Cloudflare {
                api_token: "token".to_string(),
                zone_id: "zone".to_string(),
                dry_run: false,
            },
            RecordConfig::new("edge.example.com"),
        )
    }

    #[test]
    fn defaults_are_valid() {
        let config = valid();
        assert!(config.validate().is_ok());
        assert_eq!(config.source.urls, vec![DEFAULT_SOURCE_URL.to_string()]);
        assert_eq!(config.source.limit, Some(20));
        assert_eq!(config.record.strategy, ReconcileStrategy::Recreate);
        assert_eq!(config.record.ttl, 60);
        assert!(!config.record.proxied);
    }

    #[test]
    fn rejects_zero_retries() {
        let mut config = valid();
        config.source.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_fallback_entry() {
        let mut config = valid();
        config.source.fallback_ips = vec!["1.1.1.1".to_string(), "1.1.1".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("1.1.1"));
    }

    #[test]
    fn rejects_non_http_source() {
        let mut config = valid();
        config.source.urls = vec!["ftp://example.com/ips".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_zone() {
        let mut config = valid();
        config.provider = ProviderConfig::Cloudflare {
            api_token: "token".to_string(),
            zone_id: String::new(),
            dry_run: false,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn strategy_parses_aliases() {
        assert_eq!(
            "positional".parse::<ReconcileStrategy>().unwrap(),
            ReconcileStrategy::Positional
        );
        assert_eq!(
            "Delete-Recreate".parse::<ReconcileStrategy>().unwrap(),
            ReconcileStrategy::Recreate
        );
        assert!("sideways".parse::<ReconcileStrategy>().is_err());
    }

    #[test]
    fn deserializes_tagged_provider() {
        let config: EdgeDnsConfig = serde_json::from_value(serde_json::json!({
            "provider": { "type": "cloudflare", "api_token": "t", "zone_id": "z" },
            "record": { "name": "edge.example.com", "strategy": "positional" },
            "notifier": { "type": "push_plus", "token": "p" }
        }))
        .unwrap();
        assert_eq!(config.record.strategy, ReconcileStrategy::Positional);
        assert_eq!(config.source.max_retries, 5);
        assert_eq!(
            config.notifier.as_ref().map(NotifierConfig::title),
            Some("Cloudflare edge IP update")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn secrets_not_exposed_in_debug() {
        let mut config = valid();
        config.provider = ProviderConfig::Cloudflare {
            api_token: "cf-secret-token".to_string(),
            zone_id: "zone".to_string(),
            dry_run: true,
        };
        config.notifier = Some(NotifierConfig::PushPlus {
            token: "pp-secret-token".to_string(),
            title: default_notify_title(),
        });

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("cf-secret-token"));
        assert!(!debug_str.contains("pp-secret-token"));
        assert!(debug_str.contains("<REDACTED>"));
        assert!(debug_str.contains("dry_run: true"));
    }
}
