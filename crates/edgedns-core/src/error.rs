//! Error type shared by the core and its collaborator crates
//!
//! Collaborators (`IpFeed`, `DnsProvider`, `Notifier`) return these errors;
//! the resolver and reconciler turn them into recorded failures rather than
//! propagating them out of a run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Candidate-IP feed unreachable or answered with a non-2xx status
    #[error("IP feed error: {0}")]
    Feed(String),

    /// Summary could not be delivered
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Missing or out-of-range setting
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// Provider rejected the credentials (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record or zone does not exist (404)
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Any other failed provider call, tagged with the provider name
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },
}

impl Error {
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_name_the_provider() {
        let err = Error::provider("cloudflare", "HTTP 500 Internal Server Error");
        assert_eq!(
            err.to_string(),
            "Provider error (cloudflare): HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn messages_carry_their_category() {
        assert_eq!(Error::feed("HTTP error: 503").to_string(), "IP feed error: HTTP error: 503");
        assert_eq!(Error::timeout("GET /").to_string(), "Timed out: GET /");
        assert!(matches!(Error::auth("bad token"), Error::Authentication(_)));
    }
}
