//! Moonraker (Klipper) status client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AdapterError, Result};
use crate::traits::{RawStatus, StatusSource};

/// Objects queried per poll: printing state, job file, progress.
const QUERY_PATH: &str = "/printer/objects/query?\
print_stats=state,filename,print_duration\
&virtual_sdcard=progress";

/// Status client for a Moonraker API server.
pub struct MoonrakerClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl MoonrakerClient {
    /// Creates a client for the given base URL, with a per-request timeout.
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token,
        })
    }
}

#[async_trait]
impl StatusSource for MoonrakerClient {
    async fn fetch_status(&self) -> Result<RawStatus> {
        let mut request = self.http.get(format!("{}{}", self.base_url, QUERY_PATH));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body: Value = request
            .send()
            .await
            .map_err(AdapterError::from_http)?
            .error_for_status()
            .map_err(AdapterError::from_http)?
            .json()
            .await
            .map_err(AdapterError::from_http)?;

        parse_status(&body)
    }
}

/// Extracts a raw status from a Moonraker objects-query reply.
fn parse_status(body: &Value) -> Result<RawStatus> {
    let status = body
        .get("result")
        .and_then(|r| r.get("status"))
        .ok_or_else(|| AdapterError::Protocol("missing result.status in reply".into()))?;

    let print_stats = status.get("print_stats").cloned().unwrap_or_default();

    let state_text = print_stats
        .get("state")
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::Protocol("missing print_stats.state".into()))?;

    let job = print_stats
        .get("filename")
        .and_then(Value::as_str)
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    let progress = status
        .get("virtual_sdcard")
        .and_then(|v| v.get("progress"))
        .and_then(Value::as_f64);

    let mut raw = RawStatus::new(state_text);
    raw.job = job;
    raw.progress = progress;
    Ok(raw)
}
