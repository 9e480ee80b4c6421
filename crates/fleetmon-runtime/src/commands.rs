//! Interactive command loop: Listening -> Dispatching -> Listening.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use fleetmon_adapters::{AdapterError, CommandSource, InboundCommand, MessagingSink, PowerControl};
use fleetmon_models::{NotificationEvent, NotificationKind, Printer, ProcessMeta};

use crate::cache::FleetCache;
use crate::notify::{render_info, render_status};

/// Pause after a source error before listening again.
const SOURCE_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Reply sent when a handler fails unexpectedly.
const GENERIC_ERROR_REPLY: &str =
    "⚠️ Something went wrong while handling that command. Please try again.";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetCommand {
    /// `/status` - fleet status, one line per printer.
    Status,
    /// `/info` - process and fleet metadata.
    Info,
    /// `/help` (or `/start`) - command overview.
    Help,
    /// `/power <printer> on|off` - switch a printer's smart plug.
    Power {
        /// Printer name.
        printer: String,
        /// Desired plug state.
        on: bool,
    },
}

impl FleetCommand {
    /// Parses a command text, tolerating the `/cmd@BotName` form.
    ///
    /// Returns `None` for anything unrecognized; the loop answers those with
    /// the help text.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.trim().split_whitespace();
        let head = words.next()?;

        // "/status@FleetBot" and "/status" are the same command
        let command = head.split('@').next()?;

        match command {
            "/status" => Some(FleetCommand::Status),
            "/info" => Some(FleetCommand::Info),
            "/help" | "/start" => Some(FleetCommand::Help),
            "/power" => {
                let printer = words.next()?.to_string();
                let on = match words.next()? {
                    "on" => true,
                    "off" => false,
                    _ => return None,
                };
                Some(FleetCommand::Power { printer, on })
            }
            _ => None,
        }
    }
}

/// Help text for `/help` and unknown commands.
fn help_text() -> String {
    "Available commands:\n\
     /status — status of every printer\n\
     /info — monitor version, uptime and fleet composition\n\
     /power <printer> on|off — switch a printer's smart plug\n\
     /help — this message"
        .to_string()
}

/// Long-running listener for inbound chat commands.
///
/// Alternates between Listening (awaiting the next batch from the command
/// source, racing the shutdown signal) and Dispatching (exactly one handler
/// per command). Handler failures become a generic error reply; the loop
/// itself survives any single failure.
pub struct CommandLoop {
    source: Box<dyn CommandSource>,
    sink: Arc<dyn MessagingSink>,
    cache: Arc<FleetCache>,
    printers: Arc<Vec<Printer>>,
    plugs: HashMap<String, Box<dyn PowerControl>>,
    meta: Arc<ProcessMeta>,
    /// Shutdown signal receiver.
    shutdown: watch::Receiver<bool>,
}

impl CommandLoop {
    /// Creates the command loop.
    pub fn new(
        source: Box<dyn CommandSource>,
        sink: Arc<dyn MessagingSink>,
        cache: Arc<FleetCache>,
        printers: Arc<Vec<Printer>>,
        plugs: HashMap<String, Box<dyn PowerControl>>,
        meta: Arc<ProcessMeta>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            sink,
            cache,
            printers,
            plugs,
            meta,
            shutdown,
        }
    }

    /// Run until the shutdown signal.
    ///
    /// The shutdown channel is raced against every listen, so shutdown
    /// latency is bounded by the source's poll timeout.
    pub async fn run(&mut self) {
        info!("command loop started");

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    if *self.shutdown.borrow() {
                        debug!("command loop received shutdown signal");
                        break;
                    }
                }
                batch = self.source.next_commands() => match batch {
                    Ok(commands) => {
                        for command in commands {
                            self.dispatch(command).await;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "command source failed, backing off");
                        tokio::time::sleep(SOURCE_ERROR_BACKOFF).await;
                    }
                }
            }
        }

        info!("command loop stopped");
    }

    /// Dispatch exactly one command and send the reply.
    async fn dispatch(&self, command: InboundCommand) {
        debug!(chat = %command.chat, text = %command.text, "dispatching command");

        let reply = match FleetCommand::parse(&command.text) {
            Some(parsed) => match self.handle(parsed).await {
                Ok(text) => text,
                Err(e) => {
                    error!(text = %command.text, error = %e, "command handler failed");
                    GENERIC_ERROR_REPLY.to_string()
                }
            },
            None => help_text(),
        };

        let event = NotificationEvent::new(NotificationKind::CommandReply, command.chat, reply);
        if let Err(e) = self.sink.send(event).await {
            warn!(chat = %command.chat, error = %e, "failed to send command reply");
        }
    }

    async fn handle(&self, command: FleetCommand) -> std::result::Result<String, AdapterError> {
        match command {
            FleetCommand::Status => {
                let snapshot = self.cache.snapshot().await;
                Ok(render_status(&self.printers, &snapshot))
            }
            FleetCommand::Info => {
                let snapshot = self.cache.snapshot().await;
                Ok(render_info(&self.meta, &snapshot))
            }
            FleetCommand::Help => Ok(help_text()),
            FleetCommand::Power { printer, on } => {
                if !self.cache.contains(&printer) {
                    return Ok(format!(
                        "Unknown printer '{}'. Use /status to list the fleet.",
                        printer
                    ));
                }

                match self.plugs.get(&printer) {
                    None => Ok(format!("ℹ️ {} has no smart plug configured.", printer)),
                    Some(plug) => {
                        let state = plug.set_power(on).await?;
                        Ok(format!(
                            "🔌 {} plug switched {} (plug reports: {})",
                            printer,
                            if on { "on" } else { "off" },
                            state
                        ))
                    }
                }
            }
        }
    }
}
