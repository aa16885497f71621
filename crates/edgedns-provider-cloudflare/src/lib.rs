// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `edgedns_core::DnsProvider`.
//
// ## Behavior
//
// - One API exchange per trait call (listing follows pagination)
// - Non-2xx and `success = false` payloads are both errors
// - Status mapping: 401/403 auth, 404 not found, 409 conflict,
//   429 rate limited, 5xx transient server error
// - HTTP timeout configured (30 seconds)
// - Dry-run mode: listing is live, mutations are logged and skipped
// - No retry, no backoff, no caching: the reconciler owns those decisions
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider fails fast if token or zone is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Overwrite DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use edgedns_core::config::ProviderConfig;
use edgedns_core::traits::{DnsProvider, DnsRecord, NewRecord, RECORD_TYPE_A};
use edgedns_core::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per listing page (Cloudflare maximum for this endpoint)
const PER_PAGE: u32 = 100;

const PROVIDER: &str = "cloudflare";

/// Envelope of every Cloudflare v4 response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: u32,
}

fn describe(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error detail".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a non-2xx status to the matching error kind
/// DNS names compare case-insensitively and with or without the root dot
fn same_name(a: &str, b: &str) -> bool {
    let a = a.strip_suffix('.').unwrap_or(a);
    let b = b.strip_suffix('.').unwrap_or(b);
    a.eq_ignore_ascii_case(b)
}

fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    // Prefer Cloudflare's own error list over the raw body
    let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .map(|r| describe(&r.errors))
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{}: {}", context, detail)),
        409 => Error::provider(
            PROVIDER,
            format!("Conflict while trying to {}. Status: {} - {}", context, status, detail),
        ),
        429 => Error::rate_limited(format!("Rate limit exceeded. Status: {}", status)),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Cloudflare server error (transient): {} - {}", status, detail),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("Failed to {}: {} - {}", context, status, detail),
        ),
    }
}

/// Cloudflare DNS provider
///
/// Stateless and single-shot. All coordination (ordering, failure isolation)
/// is owned by `DnsReconciler`.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform listing requests normally
/// - Log the intended create/update/delete payloads
/// - **NOT** actually modify DNS records, returning synthetic successes
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    zone_id: String,

    /// API root, overridable for tests
    base_url: String,

    client: reqwest::Client,

    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone holding the managed record
    /// - `dry_run`: If true, list records but skip mutations
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)` if the token or zone is empty
    /// - `Err(Error::Http)` if the HTTP client cannot be built
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        let zone_id = zone_id.into();

        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            zone_id,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Build a provider from its configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Cloudflare {
                api_token,
                zone_id,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!(
                        "Cloudflare provider running in DRY-RUN mode - no changes will be made"
                    );
                }
                Self::new(api_token.clone(), zone_id.clone(), *dry_run)
            }
        }
    }

    /// Point the provider at a different API root (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, self.zone_id)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    /// Send a request and unwrap the v4 envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<(Option<T>, Option<ResultInfo>)> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(format!("Cloudflare request to {} timed out", context))
                } else {
                    Error::provider(PROVIDER, format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, &body, context));
        }

        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        if !parsed.success {
            return Err(Error::provider(
                PROVIDER,
                format!("Failed to {}: {}", context, describe(&parsed.errors)),
            ));
        }

        Ok((parsed.result, parsed.result_info))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List every A record with this exact name, following pagination
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=edge.example.com&page=1&per_page=100
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, name: &str) -> Result<Vec<DnsRecord>> {
        let query_name = name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase();
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!("Listing A records for {} (page {})", name, page);

            let request = self.client.get(self.records_url()).query(&[
                ("type", RECORD_TYPE_A.to_string()),
                ("name", query_name.clone()),
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
            ]);

            let (result, info) = self
                .execute::<Vec<DnsRecord>>(request, "list DNS records")
                .await?;
            let batch = result.unwrap_or_default();
            let batch_len = batch.len();
            records.extend(batch);

            let total_pages = info.map(|i| i.total_pages.max(i.page)).unwrap_or(page);
            if page >= total_pages || batch_len == 0 {
                break;
            }
            page += 1;
        }

        // Same name, A only, whatever the server did with the query
        records.retain(|r| same_name(&r.name, name) && r.record_type == RECORD_TYPE_A);

        tracing::debug!("Found {} A record(s) for {}", records.len(), name);
        Ok(records)
    }

    /// Create an A record
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// {"type":"A","name":"edge.example.com","content":"1.2.3.4","ttl":60,"proxied":false}
    /// ```
    async fn create_record(&self, record: &NewRecord) -> Result<DnsRecord> {
        let payload = serde_json::json!({
            "type": RECORD_TYPE_A,
            "name": record.name,
            "content": record.content.to_string(),
            "ttl": record.ttl,
            "proxied": record.proxied,
        });

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                self.records_url(),
                payload
            );
            return Ok(DnsRecord {
                id: format!("dry-run-{}", record.content),
                name: record.name.clone(),
                record_type: RECORD_TYPE_A.to_string(),
                content: record.content.to_string(),
                ttl: record.ttl,
                proxied: record.proxied,
            });
        }

        let request = self.client.post(self.records_url()).json(&payload);
        let (result, _) = self
            .execute::<DnsRecord>(request, "create DNS record")
            .await?;

        result.ok_or_else(|| Error::provider(PROVIDER, "Create response carried no record"))
    }

    /// Overwrite a record, sending every attribute
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {"type":"A","name":"edge.example.com","content":"1.2.3.4","ttl":300,"proxied":true}
    /// ```
    async fn update_record(&self, record: &DnsRecord) -> Result<DnsRecord> {
        let url = self.record_url(&record.id);
        let payload = serde_json::json!({
            "type": record.record_type,
            "name": record.name,
            "content": record.content,
            "ttl": record.ttl,
            "proxied": record.proxied,
        });

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                payload
            );
            return Ok(record.clone());
        }

        let request = self.client.put(url).json(&payload);
        let (result, _) = self
            .execute::<DnsRecord>(request, "update DNS record")
            .await?;

        Ok(result.unwrap_or_else(|| record.clone()))
    }

    /// Delete a record by id
    ///
    /// ```http
    /// DELETE /zones/:zone_id/dns_records/:record_id
    /// ```
    async fn delete_record(&self, record_id: &str) -> Result<()> {
        let url = self.record_url(record_id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", url);
            return Ok(());
        }

        let request = self.client.delete(url);
        self.execute::<serde_json::Value>(request, "delete DNS record")
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
