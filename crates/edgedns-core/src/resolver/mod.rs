//! Upstream IP source resolution
//!
//! The [`IpSourceResolver`] turns an unreliable feed into a trustworthy
//! [`ResolvedIpSet`]:
//!
//! ```text
//! for attempt in 1..=max_retries:
//!     for url in urls:
//!         fetch (with timeout) ──► non-empty body? ──► extract ──► any valid IPs? ──► done
//!                 │ failure             │ no             │            │ no
//!                 └──────── record FetchFailure, next url ┴────────────┘
//!     pause retry_delay (not after the last attempt)
//! fallback list configured? ──► validated fallback
//! otherwise                 ──► Unresolved
//! ```
//!
//! A 200 response with an empty or unparseable body counts the same as a
//! network failure. Nothing here is fatal; the worst case is `Unresolved`.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::extract::{Extraction, extract};
use crate::ip::{IpOrigin, ResolvedIpSet};
use crate::traits::IpFeed;

/// Why one URL failed during one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Transport error or non-2xx status
    Fetch(String),
    /// No response within the per-attempt timeout
    Timeout(Duration),
    /// 2xx with a blank body
    EmptyBody,
    /// 2xx body from which no strategy produced a valid address
    NoAddresses,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Fetch(msg) => write!(f, "fetch failed: {}", msg),
            FailureReason::Timeout(limit) => write!(f, "timed out after {:?}", limit),
            FailureReason::EmptyBody => f.write_str("empty response body"),
            FailureReason::NoAddresses => f.write_str("no valid IPv4 address in response"),
        }
    }
}

/// One failed URL/attempt combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// 1-based attempt number
    pub attempt: usize,
    pub url: String,
    pub reason: FailureReason,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attempt {}, {}: {}", self.attempt, self.url, self.reason)
    }
}

/// Outcome of [`IpSourceResolver::resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedIpSet),
    /// Every source and retry was exhausted and no fallback was usable
    Unresolved { failures: Vec<FetchFailure> },
}

/// Resolves the candidate edge IP list from the configured sources
///
/// The resolver owns the retry policy; the [`IpFeed`] it wraps makes exactly
/// one request per call.
pub struct IpSourceResolver {
    feed: Box<dyn IpFeed>,
    urls: Vec<String>,
    timeout: Duration,
    max_retries: usize,
    retry_delay: Duration,
    fallback_ips: Vec<String>,
    limit: Option<usize>,
    limit_applies_to_fallback: bool,
}

impl IpSourceResolver {
    /// Create a resolver over `feed`
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)` if `config` is invalid
    pub fn new(feed: Box<dyn IpFeed>, config: &SourceConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            feed,
            urls: config.urls.clone(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            fallback_ips: config
                .fallback_ips
                .iter()
                .map(|ip| ip.trim().to_string())
                .collect(),
            limit: config.limit,
            limit_applies_to_fallback: config.limit_applies_to_fallback,
        })
    }

    /// Resolve the current candidate list
    ///
    /// Returns on the first URL that yields at least one valid address,
    /// without trying further URLs or attempts.
    pub async fn resolve(&self) -> Resolution {
        let mut failures = Vec::new();

        for attempt in 1..=self.max_retries {
            for url in &self.urls {
                info!(
                    "Fetching edge IPs from {} (attempt {}/{})",
                    url, attempt, self.max_retries
                );

                match self.try_source(url).await {
                    Ok(extraction) => {
                        let resolved = ResolvedIpSet::from_ips(
                            extraction.ips,
                            IpOrigin::Feed {
                                url: url.clone(),
                                strategy: extraction.strategy,
                            },
                            self.limit,
                        );
                        info!(
                            "Resolved {} edge IP(s) from {} via {} extraction",
                            resolved.len(),
                            url,
                            extraction.strategy
                        );
                        return Resolution::Resolved(resolved);
                    }
                    Err(reason) => {
                        warn!("Source {} failed on attempt {}: {}", url, attempt, reason);
                        failures.push(FetchFailure {
                            attempt,
                            url: url.clone(),
                            reason,
                        });
                    }
                }
            }

            if attempt < self.max_retries && !self.retry_delay.is_zero() {
                debug!("Waiting {:?} before next attempt", self.retry_delay);
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        if !self.fallback_ips.is_empty() {
            let limit = if self.limit_applies_to_fallback {
                self.limit
            } else {
                None
            };
            let resolved =
                ResolvedIpSet::from_candidates(&self.fallback_ips, IpOrigin::Fallback, limit);
            if !resolved.is_empty() {
                warn!(
                    "All sources failed after {} attempt(s); using {} fallback IP(s)",
                    self.max_retries,
                    resolved.len()
                );
                return Resolution::Resolved(resolved);
            }
            warn!("Fallback list contains no valid IPv4 address");
        }

        warn!(
            "All sources failed after {} attempt(s) and no fallback is usable",
            self.max_retries
        );
        Resolution::Unresolved { failures }
    }

    /// Fetch one URL and run extraction over the body
    async fn try_source(&self, url: &str) -> std::result::Result<Extraction, FailureReason> {
        let body = match tokio::time::timeout(self.timeout, self.feed.fetch(url)).await {
            Err(_) => return Err(FailureReason::Timeout(self.timeout)),
            Ok(Err(Error::Timeout(_))) => return Err(FailureReason::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(FailureReason::Fetch(e.to_string())),
            Ok(Ok(body)) => body,
        };

        if body.trim().is_empty() {
            return Err(FailureReason::EmptyBody);
        }

        debug!(
            "Received {} bytes from {} via {}",
            body.len(),
            url,
            self.feed.feed_name()
        );

        extract(&body).ok_or(FailureReason::NoAddresses)
    }
}
