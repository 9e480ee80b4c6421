//! Outbound messaging through the Telegram Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::debug;

use fleetmon_adapters::{MessagingSink, SinkError};
use fleetmon_models::NotificationEvent;

/// Sends notifications via `sendMessage`.
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    /// Creates a sink around an existing bot instance.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessagingSink for TelegramSink {
    async fn send(&self, event: NotificationEvent) -> Result<(), SinkError> {
        self.bot
            .send_message(ChatId(event.chat.0), &event.text)
            .await
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        debug!(chat = %event.chat, kind = ?event.kind, "message delivered");
        Ok(())
    }
}
