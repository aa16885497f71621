// # PushPlus Notifier
//
// Delivers the run summary through PushPlus (pushplus.plus) as a markdown
// message.
//
// ## API
//
// ```http
// POST /send
// {"token":"...","title":"...","content":"...","template":"markdown"}
// ```
//
// PushPlus answers HTTP 200 even for rejected messages; the JSON `code`
// field is what says whether the message was accepted (200 = accepted).

use async_trait::async_trait;
use edgedns_core::config::NotifierConfig;
use edgedns_core::traits::Notifier;
use edgedns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// PushPlus API root
pub const PUSHPLUS_API_BASE: &str = "http://www.pushplus.plus";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    token: &'a str,
    title: &'a str,
    content: &'a str,
    template: &'static str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
}

/// PushPlus notification channel
pub struct PushPlusNotifier {
    /// PushPlus user token
    /// ⚠️ NEVER log this value
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for PushPlusNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushPlusNotifier")
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl PushPlusNotifier {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::config("PushPlus token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token,
            base_url: PUSHPLUS_API_BASE.to_string(),
            client,
        })
    }

    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        match config {
            NotifierConfig::PushPlus { token, .. } => Self::new(token.clone()),
        }
    }

    /// Point the notifier at a different API root (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Notifier for PushPlusNotifier {
    async fn notify(&self, title: &str, content: &str) -> Result<()> {
        let url = format!("{}/send", self.base_url);
        let payload = SendRequest {
            token: &self.token,
            title,
            content,
            template: "markdown",
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::notifier(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::notifier(format!("HTTP error: {}", status)));
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| Error::notifier(format!("Failed to parse response: {}", e)))?;

        if body.code != 200 {
            return Err(Error::notifier(format!(
                "PushPlus rejected message: code {} ({})",
                body.code,
                body.msg.as_deref().unwrap_or("no message")
            )));
        }

        tracing::debug!("PushPlus accepted message '{}'", title);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "pushplus"
    }
}
