//! Printer identity and backend configuration.

use serde::{Deserialize, Serialize};

/// The kind of control backend a printer exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Klipper firmware behind a Moonraker API server.
    #[default]
    Moonraker,
    /// OctoPrint print server.
    OctoPrint,
}

impl BackendKind {
    /// Stable lowercase name, as used in config files and rendered views.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Moonraker => "moonraker",
            BackendKind::OctoPrint => "octoprint",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured printer.
///
/// Supplied by the configuration layer at startup and read-only to the core
/// for the lifetime of the process. The `name` is the unique, stable key
/// under which the printer's status is cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    /// Unique printer name.
    pub name: String,

    /// Control backend kind.
    #[serde(default)]
    pub backend: BackendKind,

    /// Backend host or IP.
    pub host: String,

    /// Backend port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use HTTPS when talking to the backend.
    #[serde(default)]
    pub https: bool,

    /// API key for OctoPrint backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Bearer token for Moonraker backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Host or IP of the Tasmota smart plug, if the printer has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plug_host: Option<String>,
}

fn default_port() -> u16 {
    80
}

impl Printer {
    /// Creates a printer with defaults for the optional fields.
    pub fn new(name: impl Into<String>, backend: BackendKind, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend,
            host: host.into(),
            port: default_port(),
            https: false,
            api_key: None,
            token: None,
            plug_host: None,
        }
    }

    /// Base URL of the control backend, e.g. `http://voron.local:7125`.
    pub fn base_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Endpoint as shown in rendered views (`host:port`).
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether a smart plug is configured for this printer.
    pub fn has_plug(&self) -> bool {
        self.plug_host.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Moonraker.to_string(), "moonraker");
        assert_eq!(BackendKind::OctoPrint.to_string(), "octoprint");
    }

    #[test]
    fn test_base_url() {
        let mut printer = Printer::new("voron", BackendKind::Moonraker, "voron.local");
        printer.port = 7125;
        assert_eq!(printer.base_url(), "http://voron.local:7125");

        printer.https = true;
        assert_eq!(printer.base_url(), "https://voron.local:7125");
        assert_eq!(printer.endpoint(), "voron.local:7125");
    }

    #[test]
    fn test_deserialize_defaults() {
        let printer: Printer =
            serde_json::from_str(r#"{"name": "ender", "host": "192.168.1.50"}"#).unwrap();

        assert_eq!(printer.name, "ender");
        assert_eq!(printer.backend, BackendKind::Moonraker);
        assert_eq!(printer.port, 80);
        assert!(!printer.https);
        assert!(!printer.has_plug());
    }

    #[test]
    fn test_deserialize_octoprint_with_plug() {
        let printer: Printer = serde_json::from_str(
            r#"{
                "name": "prusa",
                "backend": "octoprint",
                "host": "prusa.local",
                "port": 5000,
                "api_key": "secret",
                "plug_host": "192.168.1.60"
            }"#,
        )
        .unwrap();

        assert_eq!(printer.backend, BackendKind::OctoPrint);
        assert_eq!(printer.api_key.as_deref(), Some("secret"));
        assert!(printer.has_plug());
    }
}
