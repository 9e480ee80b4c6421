//! Error types for the Telegram transport.

use thiserror::Error;

/// Errors that can occur in the Telegram transport and binary setup.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// No notification chat configured.
    #[error("no notification chat configured. Set chat_id in the fleet file or TELEGRAM_CHAT_ID.")]
    NoChat,

    /// Telegram API error.
    #[error("Telegram API error: {0}")]
    Api(String),

    /// Invalid fleet configuration.
    #[error("fleet config error: {0}")]
    Config(String),

    /// IO error (e.g. reading the fleet file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Telegram transport operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<teloxide::RequestError> for TelegramError {
    fn from(e: teloxide::RequestError) -> Self {
        TelegramError::Api(e.to_string())
    }
}
