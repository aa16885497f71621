// # edgednsd - Edge DNS Daemon
//
// Thin integration layer: all resolution, planning and reconciliation logic
// lives in edgedns-core.
//
// The edgednsd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the HTTP feed, Cloudflare provider and PushPlus notifier
// 4. Running the engine once, or on an interval until SIGTERM/SIGINT
//
// ## Configuration
//
// ### Required
// - `CF_API_TOKEN`: Cloudflare API token (Zone:DNS:Edit)
// - `CF_ZONE_ID`: Zone holding the record
// - `CF_DNS_NAME`: Record name to keep pointed at the edge IPs
//
// ### Notification
// - `PUSHPLUS_TOKEN`: PushPlus token (unset = no notifications)
//
// ### Source
// - `EDGEDNS_SOURCE_URLS`: Comma-separated feed URLs
// - `EDGEDNS_TIMEOUT_SECS`: Per-attempt timeout (default 10)
// - `EDGEDNS_MAX_RETRIES`: Attempts over all URLs (default 5)
// - `EDGEDNS_RETRY_DELAY_SECS`: Pause between attempts (default 2)
// - `EDGEDNS_LIMIT`: Max addresses kept, 0 = unlimited (default 20)
// - `EDGEDNS_LIMIT_FALLBACK`: Apply the limit to the fallback list too
// - `EDGEDNS_FALLBACK_IPS`: Comma-separated static addresses
//
// ### Record
// - `EDGEDNS_STRATEGY`: `recreate` (default) or `positional`
// - `EDGEDNS_RECORD_TTL`: TTL of created records (default 60)
// - `EDGEDNS_RECORD_PROXIED`: Proxy flag of created records (default false)
// - `EDGEDNS_MAX_RECORDS`: Cap on created records
//
// ### Daemon
// - `EDGEDNS_INTERVAL_SECS`: Run period (unset = run once and exit)
// - `EDGEDNS_MODE`: `dry-run` to list but never mutate
// - `EDGEDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export CF_API_TOKEN=your_token
// export CF_ZONE_ID=your_zone_id
// export CF_DNS_NAME=edge.example.com
// export EDGEDNS_MODE=dry-run
//
// edgednsd
// ```

use anyhow::{Context, Result};
use edgedns_core::config::DEFAULT_SOURCE_URL;
use edgedns_core::{
    EdgeDnsConfig, EdgeDnsEngine, EngineConfig, NotifierConfig, ProviderConfig,
    ReconcileStrategy, RecordConfig, SourceConfig,
};
use edgedns_feed_http::HttpIpFeed;
use edgedns_provider_cloudflare::CloudflareProvider;
use std::env;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown (including runs that changed nothing)
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum EdgeDnsExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<EdgeDnsExitCode> for ExitCode {
    fn from(code: EdgeDnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration, as read from the environment
///
/// No `Debug`: it holds the API and PushPlus tokens.
struct Config {
    api_token: String,
    zone_id: String,
    dns_name: String,
    pushplus_token: Option<String>,
    source_urls: Vec<String>,
    timeout_secs: u64,
    max_retries: usize,
    retry_delay_secs: u64,
    limit: usize,
    limit_fallback: bool,
    fallback_ips: Vec<String>,
    strategy: String,
    record_ttl: u32,
    record_proxied: bool,
    max_records: Option<usize>,
    interval_secs: Option<u64>,
    mode: String,
    log_level: String,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("{} must be true or false. Got: {}", name, other),
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let number = |name: &str| -> Result<Option<u64>> {
            match lookup(name).filter(|v| !v.trim().is_empty()) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map(Some)
                    .with_context(|| format!("{} must be a non-negative integer. Got: {}", name, v)),
                None => Ok(None),
            }
        };
        let flag = |name: &str| -> Result<bool> {
            lookup(name).map_or(Ok(false), |v| parse_flag(name, &v))
        };

        Ok(Self {
            api_token: lookup("CF_API_TOKEN").unwrap_or_default(),
            zone_id: lookup("CF_ZONE_ID").unwrap_or_default(),
            dns_name: lookup("CF_DNS_NAME").unwrap_or_default().trim().to_ascii_lowercase(),
            pushplus_token: lookup("PUSHPLUS_TOKEN").filter(|t| !t.trim().is_empty()),
            source_urls: lookup("EDGEDNS_SOURCE_URLS")
                .map(|v| split_list(&v))
                .filter(|urls| !urls.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_SOURCE_URL.to_string()]),
            timeout_secs: number("EDGEDNS_TIMEOUT_SECS")?.unwrap_or(10),
            max_retries: number("EDGEDNS_MAX_RETRIES")?.unwrap_or(5) as usize,
            retry_delay_secs: number("EDGEDNS_RETRY_DELAY_SECS")?.unwrap_or(2),
            limit: number("EDGEDNS_LIMIT")?.unwrap_or(20) as usize,
            limit_fallback: flag("EDGEDNS_LIMIT_FALLBACK")?,
            fallback_ips: lookup("EDGEDNS_FALLBACK_IPS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            strategy: lookup("EDGEDNS_STRATEGY").unwrap_or_else(|| "recreate".to_string()),
            record_ttl: u32::try_from(number("EDGEDNS_RECORD_TTL")?.unwrap_or(60))
                .context("EDGEDNS_RECORD_TTL is out of range")?,
            record_proxied: flag("EDGEDNS_RECORD_PROXIED")?,
            max_records: number("EDGEDNS_MAX_RECORDS")?.map(|n| n as usize),
            interval_secs: number("EDGEDNS_INTERVAL_SECS")?,
            mode: lookup("EDGEDNS_MODE").unwrap_or_else(|| "live".to_string()),
            log_level: lookup("EDGEDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Covers required fields, value formats and numeric ranges. Secrets are
    /// never echoed back in error messages.
    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!(
                "CF_API_TOKEN is required. \
                Set it via: export CF_API_TOKEN=your_token"
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower == "token"
        {
            anyhow::bail!(
                "CF_API_TOKEN appears to be a placeholder. \
                Use an actual API token from the Cloudflare dashboard."
            );
        }

        if self.zone_id.trim().is_empty() {
            anyhow::bail!(
                "CF_ZONE_ID is required. \
                Set it via: export CF_ZONE_ID=your_zone_id"
            );
        }

        if self.dns_name.is_empty() {
            anyhow::bail!(
                "CF_DNS_NAME is required. \
                Set it via: export CF_DNS_NAME=edge.example.com"
            );
        }
        validate_domain_name(&self.dns_name)?;

        for url in &self.source_urls {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!(
                    "EDGEDNS_SOURCE_URLS entries must use HTTP or HTTPS scheme. Got: {}",
                    url
                );
            }
        }

        for ip in &self.fallback_ips {
            if ip.parse::<Ipv4Addr>().is_err() {
                anyhow::bail!(
                    "EDGEDNS_FALLBACK_IPS entries must be IPv4 addresses. Got: {}",
                    ip
                );
            }
        }

        if !(1..=300).contains(&self.timeout_secs) {
            anyhow::bail!(
                "EDGEDNS_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            );
        }

        if !(1..=20).contains(&self.max_retries) {
            anyhow::bail!(
                "EDGEDNS_MAX_RETRIES must be between 1 and 20. Got: {}",
                self.max_retries
            );
        }

        if self.retry_delay_secs > 300 {
            anyhow::bail!(
                "EDGEDNS_RETRY_DELAY_SECS must be at most 300 seconds. Got: {}",
                self.retry_delay_secs
            );
        }

        self.strategy.parse::<ReconcileStrategy>().map_err(|_| {
            anyhow::anyhow!(
                "EDGEDNS_STRATEGY '{}' is not supported. \
                Supported strategies: recreate, positional",
                self.strategy
            )
        })?;

        // Cloudflare: 1 = automatic, otherwise 30..=86400
        if self.record_ttl != 1 && !(30..=86400).contains(&self.record_ttl) {
            anyhow::bail!(
                "EDGEDNS_RECORD_TTL must be 1 (automatic) or between 30 and 86400. Got: {}",
                self.record_ttl
            );
        }

        if self.max_records == Some(0) {
            anyhow::bail!("EDGEDNS_MAX_RECORDS must be at least 1 when set");
        }

        if let Some(interval) = self.interval_secs
            && !(60..=86400).contains(&interval)
        {
            anyhow::bail!(
                "EDGEDNS_INTERVAL_SECS must be between 60 and 86400 seconds. Got: {}",
                interval
            );
        }

        match self.mode.to_lowercase().as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "EDGEDNS_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "EDGEDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn dry_run(&self) -> bool {
        self.mode.eq_ignore_ascii_case("dry-run")
    }

    /// Build the library configuration
    fn to_edgedns_config(&self) -> Result<EdgeDnsConfig> {
        let strategy: ReconcileStrategy = self.strategy.parse()?;

        let mut record = RecordConfig::new(self.dns_name.clone()).with_strategy(strategy);
        record.ttl = self.record_ttl;
        record.proxied = self.record_proxied;
        record.max_records = self.max_records;

        let mut config = EdgeDnsConfig::new(
            ProviderConfig::Cloudflare {
                api_token: self.api_token.clone(),
                zone_id: self.zone_id.trim().to_string(),
                dry_run: self.dry_run(),
            },
            record,
        );

        config.source = SourceConfig {
            urls: self.source_urls.clone(),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            retry_delay_secs: self.retry_delay_secs,
            fallback_ips: self.fallback_ips.clone(),
            limit: (self.limit > 0).then_some(self.limit),
            limit_applies_to_fallback: self.limit_fallback,
        };

        config.notifier = self
            .pushplus_token
            .as_ref()
            .map(|token| NotifierConfig::PushPlus {
                token: token.clone(),
                title: edgedns_core::config::default_notify_title(),
            });

        config.engine = EngineConfig {
            interval_secs: self.interval_secs,
            ..EngineConfig::default()
        };

        config.validate()?;
        Ok(config)
    }
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 label checks; catches common typos, not every invalid name.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return EdgeDnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return EdgeDnsExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return EdgeDnsExitCode::ConfigError.into();
    }

    let edgedns_config = match config.to_edgedns_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return EdgeDnsExitCode::ConfigError.into();
        }
    };

    info!("Starting edgednsd for {}", config.dns_name);
    info!(
        "Strategy: {}, sources: {}, mode: {}",
        edgedns_config.record.strategy,
        edgedns_config.source.urls.join(", "),
        if config.dry_run() { "DRY-RUN" } else { "LIVE" }
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return EdgeDnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(edgedns_config).await {
            error!("Daemon error: {:#}", e);
            EdgeDnsExitCode::RuntimeError
        } else {
            EdgeDnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the components and run the engine
async fn run_daemon(config: EdgeDnsConfig) -> Result<()> {
    let feed = HttpIpFeed::with_timeout(config.source.timeout())
        .context("Failed to create HTTP feed")?;
    let provider =
        CloudflareProvider::from_config(&config.provider).context("Failed to create provider")?;
    let notifier = build_notifier(config.notifier.as_ref())?;

    let (engine, mut events) =
        EdgeDnsEngine::new(Box::new(feed), Box::new(provider), notifier, config)
            .context("Failed to create engine")?;

    let event_logger = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!("Engine event: {:?}", event);
        }
    });

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let signal_listener = tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => {
                info!("Received shutdown signal: {}", signal);
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // Dropping the sender would read as a shutdown request
                error!("Shutdown listener error: {}", e);
                let _keep_open = shutdown_tx;
                std::future::pending::<()>().await;
            }
        }
    });

    let result = engine.run_with_shutdown(Some(shutdown_rx)).await;

    signal_listener.abort();
    drop(engine);
    let _ = event_logger.await;

    result?;
    info!("edgednsd finished");
    Ok(())
}

#[cfg(feature = "pushplus")]
fn build_notifier(
    config: Option<&NotifierConfig>,
) -> Result<Option<Box<dyn edgedns_core::Notifier>>> {
    match config {
        Some(cfg) => {
            let notifier = edgedns_notify_pushplus::PushPlusNotifier::from_config(cfg)
                .context("Failed to create PushPlus notifier")?;
            info!("PushPlus notifications enabled");
            Ok(Some(Box::new(notifier)))
        }
        None => {
            info!("PUSHPLUS_TOKEN not set, notifications disabled");
            Ok(None)
        }
    }
}

#[cfg(not(feature = "pushplus"))]
fn build_notifier(
    config: Option<&NotifierConfig>,
) -> Result<Option<Box<dyn edgedns_core::Notifier>>> {
    if config.is_some() {
        tracing::warn!("PUSHPLUS_TOKEN set but pushplus feature is disabled");
    }
    Ok(None)
}

/// Wait for SIGTERM or SIGINT
///
/// # Returns
///
/// The name of the signal received
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("CF_API_TOKEN", "cf-0123456789abcdef0123456789abcdef"),
        ("CF_ZONE_ID", "023e105f4ecef8ad9ca31a8372d0c353"),
        ("CF_DNS_NAME", "edge.example.com"),
    ];

    fn with_required(extra: &[(&str, &str)]) -> Result<Config> {
        let mut vars = REQUIRED.to_vec();
        vars.extend_from_slice(extra);
        config_from(&vars)
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = with_required(&[]).unwrap();
        config.validate().unwrap();

        assert_eq!(config.source_urls, vec![DEFAULT_SOURCE_URL.to_string()]);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_secs, 2);
        assert_eq!(config.limit, 20);
        assert_eq!(config.record_ttl, 60);
        assert!(!config.record_proxied);
        assert!(config.pushplus_token.is_none());
        assert!(!config.dry_run());

        let edgedns = config.to_edgedns_config().unwrap();
        assert_eq!(edgedns.record.strategy, ReconcileStrategy::Recreate);
        assert_eq!(edgedns.source.limit, Some(20));
        assert!(edgedns.notifier.is_none());
        assert!(edgedns.engine.interval_secs.is_none());
    }

    #[test]
    fn missing_required_values_are_rejected() {
        for missing in ["CF_API_TOKEN", "CF_ZONE_ID", "CF_DNS_NAME"] {
            let vars: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = config_from(&vars).unwrap().validate().unwrap_err();
            assert!(err.to_string().contains(missing), "{}: {}", missing, err);
        }
    }

    #[test]
    fn record_name_is_lowercased() {
        let config = with_required(&[("CF_DNS_NAME", " Edge.Example.com ")]).unwrap();
        config.validate().unwrap();
        assert_eq!(config.dns_name, "edge.example.com");
    }

    #[test]
    fn zero_retries_is_rejected() {
        let config = with_required(&[("EDGEDNS_MAX_RETRIES", "0")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_source_url_is_rejected() {
        let config = with_required(&[("EDGEDNS_SOURCE_URLS", "https://ok.example, ftp://bad")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ftp://bad"));
    }

    #[test]
    fn invalid_fallback_entry_is_rejected() {
        let config =
            with_required(&[("EDGEDNS_FALLBACK_IPS", "104.16.0.1, 999.1.1.1")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let config = with_required(&[("EDGEDNS_STRATEGY", "shuffle")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("shuffle"));
    }

    #[test]
    fn non_numeric_value_fails_to_load() {
        assert!(with_required(&[("EDGEDNS_TIMEOUT_SECS", "ten")]).is_err());
    }

    #[test]
    fn token_never_appears_in_validation_errors() {
        let config = config_from(&[
            ("CF_API_TOKEN", "cf-0123456789abcdef0123456789abcdef"),
            ("CF_DNS_NAME", "edge.example.com"),
        ])
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(!err.to_string().contains("cf-0123456789"));
    }

    #[test]
    fn full_configuration_maps_onto_library_config() {
        let config = with_required(&[
            ("PUSHPLUS_TOKEN", "pp-token"),
            ("EDGEDNS_SOURCE_URLS", "https://a.example/ips,https://b.example/ips"),
            ("EDGEDNS_LIMIT", "0"),
            ("EDGEDNS_LIMIT_FALLBACK", "true"),
            ("EDGEDNS_FALLBACK_IPS", "104.16.0.1,104.16.0.2"),
            ("EDGEDNS_STRATEGY", "positional"),
            ("EDGEDNS_RECORD_TTL", "1"),
            ("EDGEDNS_RECORD_PROXIED", "yes"),
            ("EDGEDNS_MAX_RECORDS", "4"),
            ("EDGEDNS_INTERVAL_SECS", "900"),
            ("EDGEDNS_MODE", "dry-run"),
        ])
        .unwrap();
        config.validate().unwrap();

        let edgedns = config.to_edgedns_config().unwrap();
        assert_eq!(edgedns.source.urls.len(), 2);
        assert_eq!(edgedns.source.limit, None);
        assert!(edgedns.source.limit_applies_to_fallback);
        assert_eq!(edgedns.source.fallback_ips.len(), 2);
        assert_eq!(edgedns.record.strategy, ReconcileStrategy::Positional);
        assert_eq!(edgedns.record.ttl, 1);
        assert!(edgedns.record.proxied);
        assert_eq!(edgedns.record.max_records, Some(4));
        assert_eq!(edgedns.engine.interval_secs, Some(900));
        assert!(matches!(
            edgedns.provider,
            ProviderConfig::Cloudflare { dry_run: true, .. }
        ));
        assert!(matches!(edgedns.notifier, Some(NotifierConfig::PushPlus { .. })));
    }

    #[test]
    fn domain_labels_are_checked() {
        assert!(validate_domain_name("edge.example.com").is_ok());
        assert!(validate_domain_name("_dmarc.example.com").is_ok());
        assert!(validate_domain_name("edge..example.com").is_err());
        assert!(validate_domain_name("-edge.example.com").is_err());
        assert!(validate_domain_name("ed ge.example.com").is_err());
    }
}
