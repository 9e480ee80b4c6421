//! Telegram transport for Fleetmon.
//!
//! Implements the core's messaging seams on top of the Telegram Bot API:
//!
//! - [`TelegramSink`] delivers notifications via `sendMessage`
//! - [`TelegramCommandSource`] long-polls `getUpdates` for inbound commands
//! - [`config`] loads the fleet definition from a JSON file
//!
//! The `fleetmon` binary in this crate wires everything together.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `TELEGRAM_CHAT_ID`: Notification chat, used when the fleet file does
//!   not set one

pub mod config;
pub mod error;
pub mod sink;
pub mod updates;

pub use config::{load_fleet_file, FleetFile};
pub use error::{Result, TelegramError};
pub use sink::TelegramSink;
pub use updates::TelegramCommandSource;
