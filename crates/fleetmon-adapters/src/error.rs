//! Error types for the adapter crate.

use thiserror::Error;

/// Errors from backend and plug adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Backend could not be reached (connect failure or timeout).
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// Backend was reached but replied with something unexpected.
    #[error("backend protocol error: {0}")]
    Protocol(String),

    /// Smart plug could not be reached or gave a bad reply.
    #[error("plug unreachable: {0}")]
    PlugUnreachable(String),

    /// The printer has no plug host configured.
    #[error("no plug configured for this printer")]
    NoPlug,

    /// HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Http(String),
}

impl AdapterError {
    /// Classifies a reqwest error: connect/timeout failures mean the
    /// backend is unreachable, everything else (bad status, decode) means
    /// it answered but not in a way we understand.
    pub fn from_http(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            AdapterError::Unreachable(err.to_string())
        } else {
            AdapterError::Protocol(err.to_string())
        }
    }
}

/// Errors from the messaging transport.
#[derive(Debug, Error)]
pub enum SinkError {
    /// An outbound message could not be delivered.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Inbound commands could not be fetched.
    #[error("receive failed: {0}")]
    Receive(String),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
