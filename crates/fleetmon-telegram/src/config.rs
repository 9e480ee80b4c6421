//! Fleet configuration file loading.
//!
//! The fleet file is JSON: a printer list plus optional notification chat
//! and timing overrides. Printers are immutable for the process lifetime;
//! editing the file requires a restart.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use fleetmon_models::Printer;
use fleetmon_runtime::FleetConfig;

use crate::error::{Result, TelegramError};

/// Parsed fleet file.
#[derive(Debug, Deserialize)]
pub struct FleetFile {
    /// Telegram chat for startup messages and overviews.
    #[serde(default)]
    pub chat_id: Option<i64>,

    /// Poll interval override, seconds.
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    /// First overview delay override, seconds.
    #[serde(default)]
    pub first_overview_delay_secs: Option<u64>,

    /// Second overview delay override, seconds.
    #[serde(default)]
    pub second_overview_delay_secs: Option<u64>,

    /// The configured fleet.
    pub printers: Vec<Printer>,
}

impl FleetFile {
    /// Builds the runtime config, applying the file's overrides onto the
    /// defaults.
    pub fn fleet_config(&self) -> FleetConfig {
        let mut config = FleetConfig::default();

        if let Some(secs) = self.poll_interval_secs {
            config = config.with_poll_interval(Duration::from_secs(secs));
        }

        let first = self
            .first_overview_delay_secs
            .map(Duration::from_secs)
            .unwrap_or(config.first_overview_delay);
        let second = self
            .second_overview_delay_secs
            .map(Duration::from_secs)
            .unwrap_or(config.second_overview_delay);

        config.with_overview_delays(first, second)
    }
}

/// Loads and validates a fleet file.
pub fn load_fleet_file(path: &Path) -> Result<FleetFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TelegramError::Config(format!("cannot read fleet file {}: {}", path.display(), e))
    })?;

    let fleet: FleetFile = serde_json::from_str(&content)?;

    if fleet.printers.is_empty() {
        return Err(TelegramError::Config(
            "fleet file contains no printers".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for printer in &fleet.printers {
        if printer.name.trim().is_empty() {
            return Err(TelegramError::Config(
                "printer with empty name in fleet file".to_string(),
            ));
        }
        if !seen.insert(printer.name.as_str()) {
            return Err(TelegramError::Config(format!(
                "duplicate printer name '{}' in fleet file",
                printer.name
            )));
        }
    }

    Ok(fleet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fleet(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_fleet() {
        let file = write_fleet(
            r#"{
                "chat_id": -10042,
                "printers": [
                    { "name": "voron", "host": "voron.local", "port": 7125 }
                ]
            }"#,
        );

        let fleet = load_fleet_file(file.path()).unwrap();

        assert_eq!(fleet.chat_id, Some(-10042));
        assert_eq!(fleet.printers.len(), 1);
        assert_eq!(fleet.printers[0].name, "voron");
    }

    #[test]
    fn test_overrides_map_to_config() {
        let file = write_fleet(
            r#"{
                "poll_interval_secs": 10,
                "first_overview_delay_secs": 5,
                "second_overview_delay_secs": 120,
                "printers": [ { "name": "a", "host": "a.local" } ]
            }"#,
        );

        let fleet = load_fleet_file(file.path()).unwrap();
        let config = fleet.fleet_config();

        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.adapter_timeout, Duration::from_secs(12));
        assert_eq!(config.first_overview_delay, Duration::from_secs(5));
        assert_eq!(config.second_overview_delay, Duration::from_secs(120));
    }

    #[test]
    fn test_defaults_without_overrides() {
        let file = write_fleet(r#"{ "printers": [ { "name": "a", "host": "a.local" } ] }"#);

        let fleet = load_fleet_file(file.path()).unwrap();
        let config = fleet.fleet_config();

        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.first_overview_delay, Duration::from_secs(10));
        assert_eq!(config.second_overview_delay, Duration::from_secs(60));
        assert!(fleet.chat_id.is_none());
    }

    #[test]
    fn test_empty_fleet_rejected() {
        let file = write_fleet(r#"{ "printers": [] }"#);

        assert!(matches!(
            load_fleet_file(file.path()),
            Err(TelegramError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let file = write_fleet(
            r#"{
                "printers": [
                    { "name": "a", "host": "a.local" },
                    { "name": "a", "host": "other.local" }
                ]
            }"#,
        );

        let err = load_fleet_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate printer name"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_fleet_file(Path::new("/nonexistent/fleet.json"));
        assert!(matches!(result, Err(TelegramError::Config(_))));
    }
}
