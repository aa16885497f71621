use async_trait::async_trait;

/// Trait for operator notification channels
///
/// An unconfigured channel is represented by the absence of a notifier
/// (`Option::None` in the engine), never by an implementation that errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message with a title and markdown body
    async fn notify(&self, title: &str, content: &str) -> Result<(), crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
