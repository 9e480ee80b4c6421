//! Capability traits for printer backends and smart plugs.

use async_trait::async_trait;

use crate::error::Result;

/// Raw status as reported by a backend, before normalization.
///
/// `state_text` is the backend's own vocabulary (Moonraker `print_stats`
/// states, OctoPrint job state strings); the runtime's normalizer maps it
/// onto the four fleet states.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatus {
    /// Backend-reported state text, lowercased by the adapter.
    pub state_text: String,
    /// Current job file name, if any.
    pub job: Option<String>,
    /// Job progress in `0.0..=1.0`, if reported.
    pub progress: Option<f64>,
}

impl RawStatus {
    /// Creates a raw status with just a state text.
    pub fn new(state_text: impl Into<String>) -> Self {
        Self {
            state_text: state_text.into().to_lowercase(),
            job: None,
            progress: None,
        }
    }
}

/// State of a smart plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Plug is on.
    On,
    /// Plug is off.
    Off,
    /// Plug answered, but the state could not be determined.
    Unknown,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
            PowerState::Unknown => "UNKNOWN",
        })
    }
}

/// Fetches the raw status of one printer's control backend.
///
/// Implementations must bound every call with a timeout so a hung backend
/// can never stall the poller indefinitely, and must not retry internally.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Queries the backend once.
    async fn fetch_status(&self) -> Result<RawStatus>;
}

/// Queries and switches one printer's smart plug.
#[async_trait]
pub trait PowerControl: Send + Sync {
    /// Reads the current plug state.
    async fn power_state(&self) -> Result<PowerState>;

    /// Switches the plug and returns the state it reported afterwards.
    async fn set_power(&self, on: bool) -> Result<PowerState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_status_lowercases_state_text() {
        let raw = RawStatus::new("Printing");
        assert_eq!(raw.state_text, "printing");
        assert!(raw.job.is_none());
        assert!(raw.progress.is_none());
    }

    #[test]
    fn test_power_state_display() {
        assert_eq!(PowerState::On.to_string(), "ON");
        assert_eq!(PowerState::Off.to_string(), "OFF");
        assert_eq!(PowerState::Unknown.to_string(), "UNKNOWN");
    }
}
