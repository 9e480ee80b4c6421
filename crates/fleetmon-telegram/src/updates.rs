//! Inbound commands via `getUpdates` long polling.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::*;
use teloxide::types::{AllowedUpdate, UpdateKind};
use tracing::trace;

use fleetmon_adapters::{CommandSource, InboundCommand, SinkError};
use fleetmon_models::ChatTarget;

/// Long-polls the Telegram API for new messages and surfaces commands.
///
/// Only message updates are requested. The confirmed-update offset is
/// tracked locally, so every update is delivered at most once.
pub struct TelegramCommandSource {
    bot: Bot,
    offset: Option<i32>,
    poll_timeout_secs: u32,
}

impl TelegramCommandSource {
    /// Creates a command source with the given long-poll timeout.
    pub fn new(bot: Bot, poll_timeout: Duration) -> Self {
        Self {
            bot,
            offset: None,
            poll_timeout_secs: poll_timeout.as_secs().min(u32::MAX as u64) as u32,
        }
    }
}

#[async_trait]
impl CommandSource for TelegramCommandSource {
    async fn next_commands(&mut self) -> Result<Vec<InboundCommand>, SinkError> {
        let mut request = self
            .bot
            .get_updates()
            .timeout(self.poll_timeout_secs)
            .allowed_updates(vec![AllowedUpdate::Message]);
        if let Some(offset) = self.offset {
            request = request.offset(offset);
        }

        let updates = request
            .await
            .map_err(|e| SinkError::Receive(e.to_string()))?;

        let mut commands = Vec::new();
        for update in updates {
            // confirm this update on the next poll, whatever it contains
            let next_offset = update.id.0 as i32 + 1;
            self.offset = Some(self.offset.map_or(next_offset, |o| o.max(next_offset)));

            let UpdateKind::Message(message) = update.kind else {
                continue;
            };
            let Some(text) = message.text() else {
                continue;
            };

            // plain chatter is ignored; the command loop only wants commands
            if !text.trim_start().starts_with('/') {
                trace!(chat_id = %message.chat.id, "ignoring non-command message");
                continue;
            }

            commands.push(InboundCommand::new(
                ChatTarget(message.chat.id.0),
                text.trim(),
            ));
        }

        Ok(commands)
    }
}
