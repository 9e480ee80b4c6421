//! Tasmota smart plug client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AdapterError, Result};
use crate::traits::{PowerControl, PowerState};

/// Default timeout for plug requests; plugs answer fast or not at all.
pub const DEFAULT_PLUG_TIMEOUT: Duration = Duration::from_secs(3);

/// Power control for a Tasmota smart plug.
///
/// Tasmota exposes everything through `GET /cm?cmnd=...`; the reply is a
/// JSON object whose `POWER` (or `POWER1`, `POWER2`, ...) key carries the
/// state.
pub struct TasmotaPlug {
    http: reqwest::Client,
    host: String,
}

impl TasmotaPlug {
    /// Creates a plug client for the given host or IP.
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Http(e.to_string()))?;

        Ok(Self {
            http,
            host: host.into(),
        })
    }

    async fn command(&self, cmnd: &str) -> Result<Value> {
        let url = format!("http://{}/cm?cmnd={}", self.host, cmnd);
        self.http
            .get(&url)
            .send()
            .await
            .map_err(|e| AdapterError::PlugUnreachable(e.to_string()))?
            .error_for_status()
            .map_err(|e| AdapterError::PlugUnreachable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AdapterError::PlugUnreachable(e.to_string()))
    }
}

#[async_trait]
impl PowerControl for TasmotaPlug {
    async fn power_state(&self) -> Result<PowerState> {
        let body = self.command("Power").await?;
        Ok(parse_power_reply(&body))
    }

    async fn set_power(&self, on: bool) -> Result<PowerState> {
        let cmnd = if on { "Power%20On" } else { "Power%20Off" };
        let body = self.command(cmnd).await?;
        Ok(parse_power_reply(&body))
    }
}

/// Scans the reply for the first `POWER*` key.
fn parse_power_reply(body: &Value) -> PowerState {
    let Some(map) = body.as_object() else {
        return PowerState::Unknown;
    };

    for (key, value) in map {
        if key.to_uppercase().starts_with("POWER") {
            return match value.as_str().map(str::to_uppercase).as_deref() {
                Some("ON") => PowerState::On,
                Some("OFF") => PowerState::Off,
                _ => PowerState::Unknown,
            };
        }
    }

    PowerState::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_power_on() {
        assert_eq!(parse_power_reply(&json!({ "POWER": "ON" })), PowerState::On);
    }

    #[test]
    fn test_parse_numbered_power_key() {
        assert_eq!(
            parse_power_reply(&json!({ "POWER1": "OFF" })),
            PowerState::Off
        );
    }

    #[test]
    fn test_parse_unexpected_reply() {
        assert_eq!(
            parse_power_reply(&json!({ "Status": 0 })),
            PowerState::Unknown
        );
        assert_eq!(parse_power_reply(&json!("nope")), PowerState::Unknown);
    }
}
