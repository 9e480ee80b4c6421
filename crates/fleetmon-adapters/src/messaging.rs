//! Messaging seams: outbound notifications, inbound chat commands.
//!
//! The core is transport-agnostic: it consumes "command text + reply target"
//! and produces "reply text". The Telegram crate implements both traits.

use async_trait::async_trait;

use fleetmon_models::{ChatTarget, NotificationEvent};

use crate::error::SinkError;

/// A chat command received from the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    /// Chat to reply to.
    pub chat: ChatTarget,
    /// Raw command text, e.g. `/status` or `/power voron on`.
    pub text: String,
}

impl InboundCommand {
    /// Creates an inbound command.
    pub fn new(chat: ChatTarget, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: text.into(),
        }
    }
}

/// Sends rendered notifications to a chat.
///
/// Delivery is fire-and-forget from the caller's perspective: a failure is
/// reported so it can be logged, but callers must never let it affect the
/// status cache or the poller.
#[async_trait]
pub trait MessagingSink: Send + Sync {
    /// Delivers one notification event.
    async fn send(&self, event: NotificationEvent) -> std::result::Result<(), SinkError>;
}

/// Produces batches of inbound chat commands.
///
/// `next_commands` may long-poll, but must return within a bounded time even
/// when no commands arrive, so the command loop can re-check its shutdown
/// signal at least once per cycle.
#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Waits for the next batch of commands (possibly empty).
    async fn next_commands(&mut self) -> std::result::Result<Vec<InboundCommand>, SinkError>;
}
