//! OctoPrint status client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AdapterError, Result};
use crate::traits::{RawStatus, StatusSource};

/// Status client for an OctoPrint server.
pub struct OctoPrintClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OctoPrintClient {
    /// Creates a client for the given base URL, with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl StatusSource for OctoPrintClient {
    async fn fetch_status(&self) -> Result<RawStatus> {
        let mut request = self.http.get(format!("{}/api/job", self.base_url));
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
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

        parse_job(&body)
    }
}

/// Extracts a raw status from an OctoPrint `/api/job` reply.
///
/// OctoPrint reports free-form state strings ("Printing", "Operational",
/// "Printing from SD", ...); they are passed through lowercased and the
/// normalizer does the word matching.
fn parse_job(body: &Value) -> Result<RawStatus> {
    let state_text = body
        .get("state")
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::Protocol("missing state in job reply".into()))?;

    let job = body
        .get("job")
        .and_then(|j| j.get("file"))
        .and_then(|f| f.get("name"))
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    // completion is a percentage, normalized to 0..1 like Moonraker's progress
    let progress = body
        .get("progress")
        .and_then(|p| p.get("completion"))
        .and_then(Value::as_f64)
        .map(|pct| pct / 100.0);

    let mut raw = RawStatus::new(state_text);
    raw.job = job;
    raw.progress = progress;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_printing_job() {
        let body = json!({
            "state": "Printing",
            "job": { "file": { "name": "case.gcode" } },
            "progress": { "completion": 37.5, "printTime": 600 }
        });

        let raw = parse_job(&body).unwrap();
        assert_eq!(raw.state_text, "printing");
        assert_eq!(raw.job.as_deref(), Some("case.gcode"));
        assert_eq!(raw.progress, Some(0.375));
    }

    #[test]
    fn test_parse_operational_idle() {
        let body = json!({
            "state": "Operational",
            "job": { "file": { "name": null } },
            "progress": { "completion": null }
        });

        let raw = parse_job(&body).unwrap();
        assert_eq!(raw.state_text, "operational");
        assert!(raw.job.is_none());
        assert!(raw.progress.is_none());
    }

    #[test]
    fn test_parse_missing_state_is_protocol_error() {
        let body = json!({ "progress": {} });

        assert!(matches!(parse_job(&body), Err(AdapterError::Protocol(_))));
    }
}
