use async_trait::async_trait;

use crate::{domain::UserId, Result};

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_markdown: bool,
    pub max_message_len: usize,
}

/// Outbound messaging port.
///
/// Telegram is the first implementation; the shape is designed so future
/// adapters can fit behind the same interface with capability flags.
/// Delivery is fire-and-forget from the core's perspective: callers may log a
/// failed send but must not let it change job state.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(&self, user_id: UserId, text: &str) -> Result<()>;

    /// Send with Markdown emphasis enabled. Values pass through verbatim, so
    /// adapters must tolerate markup collisions in user-supplied content.
    async fn send_markdown(&self, user_id: UserId, text: &str) -> Result<()>;
}
