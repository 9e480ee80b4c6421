//! Runtime configuration.

use std::time::Duration;

/// Configuration for the fleet runtime.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// How often the poller queries every backend.
    pub poll_interval: Duration,
    /// Timeout for a single backend call. Bounds how long one slow backend
    /// can hold up its own slot in a poll cycle.
    pub adapter_timeout: Duration,
    /// Delay after startup for the first fleet overview message.
    pub first_overview_delay: Duration,
    /// Delay after startup for the second, trustworthy overview message.
    pub second_overview_delay: Duration,
    /// How long shutdown waits for each task before abandoning it.
    pub shutdown_timeout: Duration,
    /// Long-poll timeout the command source should use when waiting for
    /// inbound commands; also bounds shutdown latency of the command loop.
    pub inbound_poll_timeout: Duration,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            adapter_timeout: Duration::from_secs(7),
            first_overview_delay: Duration::from_secs(10),
            second_overview_delay: Duration::from_secs(60),
            shutdown_timeout: Duration::from_secs(2),
            inbound_poll_timeout: Duration::from_secs(25),
        }
    }
}

impl FleetConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval and derives the adapter timeout from it
    /// (interval + 2s, but never below 5s).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self.adapter_timeout = (interval + Duration::from_secs(2)).max(Duration::from_secs(5));
        self
    }

    /// Sets the adapter timeout explicitly.
    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    /// Sets the two overview delays.
    pub fn with_overview_delays(mut self, first: Duration, second: Duration) -> Self {
        self.first_overview_delay = first;
        self.second_overview_delay = second;
        self
    }

    /// Sets the shutdown join timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the inbound long-poll timeout.
    pub fn with_inbound_poll_timeout(mut self, timeout: Duration) -> Self {
        self.inbound_poll_timeout = timeout;
        self
    }
}
