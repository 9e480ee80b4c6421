//! Outbound notification events.

use serde::{Deserialize, Serialize};

/// A chat a notification is addressed to.
///
/// Transport-agnostic: for Telegram this wraps the numeric chat id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatTarget(pub i64);

impl std::fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a notification is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// One-shot message at process start.
    Startup,
    /// Scheduled or on-demand fleet overview.
    PeriodicSummary,
    /// Reply to an inbound chat command.
    CommandReply,
}

/// A rendered message on its way to the messaging sink.
///
/// Ephemeral: constructed by the dispatcher or command loop, consumed once
/// by the sink, then discarded.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    /// Why this message exists.
    pub kind: NotificationKind,
    /// Where it goes.
    pub chat: ChatTarget,
    /// The rendered message text.
    pub text: String,
}

impl NotificationEvent {
    /// Creates a notification event.
    pub fn new(kind: NotificationKind, chat: ChatTarget, text: impl Into<String>) -> Self {
        Self {
            kind,
            chat,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_construction() {
        let event = NotificationEvent::new(
            NotificationKind::Startup,
            ChatTarget(-100123),
            "fleet monitor started",
        );

        assert_eq!(event.kind, NotificationKind::Startup);
        assert_eq!(event.chat, ChatTarget(-100123));
        assert_eq!(event.text, "fleet monitor started");
        assert_eq!(event.chat.to_string(), "-100123");
    }
}
