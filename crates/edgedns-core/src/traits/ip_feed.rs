// # IP Feed Trait
//
// Defines the interface for fetching the upstream candidate-IP payload.
//
// ## Implementations
//
// - HTTP: `edgedns-feed-http` crate
//
// ## Usage
//
// ```rust,ignore
// use edgedns_core::IpFeed;
//
// let body = feed.fetch("https://stock.hostmonit.com/CloudFlareYes").await?;
// ```

use async_trait::async_trait;

/// Trait for upstream feed implementations
///
/// A feed returns the raw response body for one URL. It does not parse,
/// validate or retry: extraction and the retry policy belong to
/// [`IpSourceResolver`](crate::resolver::IpSourceResolver).
///
/// ## Contract
///
/// - One outbound request per call
/// - A non-2xx response is an `Err`
/// - A 2xx response returns the body verbatim, even if it is empty
#[async_trait]
pub trait IpFeed: Send + Sync {
    /// Fetch the body served at `url`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The response body of a 2xx response
    /// - `Err(Error)`: Transport failure, timeout or non-2xx status
    async fn fetch(&self, url: &str) -> Result<String, crate::Error>;

    /// Get the feed name (for logging/debugging)
    fn feed_name(&self) -> &'static str;
}
