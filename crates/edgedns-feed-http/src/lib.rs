// # HTTP Candidate-IP Feed
//
// This crate provides the HTTP implementation of `edgedns_core::IpFeed`.
//
// ## Behavior
//
// One GET per `fetch` call, returning the raw body. The feed does not parse
// anything: format sniffing, validation, retries and fallback all happen in
// `IpSourceResolver`.
//
// The public aggregator pages this is pointed at tend to serve a degraded
// page (or nothing) to non-browser clients, so every request carries a
// desktop-browser header profile.

use async_trait::async_trait;
use edgedns_core::traits::IpFeed;
use edgedns_core::{Error, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;

/// Desktop Chrome on Windows
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client-level timeout; the resolver also bounds each attempt
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

/// HTTP feed with a browser-like request profile
#[derive(Debug, Clone)]
pub struct HttpIpFeed {
    client: reqwest::Client,
}

impl HttpIpFeed {
    /// Create a feed with the default 10 second client timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a feed whose client gives up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl IpFeed for HttpIpFeed {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("GET {}", url))
            } else {
                Error::feed(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::feed(format!("HTTP error: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::feed(format!("Failed to read response: {}", e)))
    }

    fn feed_name(&self) -> &'static str {
        "http"
    }
}
