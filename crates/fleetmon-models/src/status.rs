//! Normalized printer status and fleet snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized state of a printer.
///
/// Exactly these four values, no sub-states. `Offline` means the backend
/// could not be reached; `Unknown` means it was reached but the reply could
/// not be classified (or no poll has completed yet). The two are deliberately
/// distinct in every rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrinterState {
    /// A job is running (or paused mid-job).
    Printing,
    /// Reachable and idle.
    Ready,
    /// Backend unreachable.
    Offline,
    /// Not yet polled, or reachable but the reply was not classifiable.
    #[default]
    Unknown,
}

impl PrinterState {
    /// Single-glyph marker used in chat messages.
    pub fn glyph(&self) -> &'static str {
        match self {
            PrinterState::Printing => "🔵",
            PrinterState::Ready => "🟢",
            PrinterState::Offline => "🔴",
            PrinterState::Unknown => "❓",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PrinterState::Printing => "Printing",
            PrinterState::Ready => "Ready",
            PrinterState::Offline => "Offline",
            PrinterState::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for PrinterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The latest known status of one printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusRecord {
    /// Normalized state.
    pub state: PrinterState,

    /// When the last poll attempt (successful or failed) completed.
    /// `None` until the first poll for this printer finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Short error message from the last failed poll, cleared on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    /// Backend-specific free text, e.g. the current job name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StatusRecord {
    /// Record from a successful poll: stamps `last_updated`, clears
    /// `last_error`.
    pub fn polled(state: PrinterState, detail: Option<String>) -> Self {
        Self {
            state,
            last_updated: Some(Utc::now()),
            last_error: None,
            detail,
        }
    }

    /// Record from a failed poll: stamps `last_updated`, sets `last_error`.
    pub fn failed(state: PrinterState, error: impl Into<String>) -> Self {
        Self {
            state,
            last_updated: Some(Utc::now()),
            last_error: Some(error.into()),
            detail: None,
        }
    }

    /// Whether any poll attempt has completed for this printer.
    pub fn has_been_polled(&self) -> bool {
        self.last_updated.is_some()
    }
}

/// An immutable, point-in-time view of the whole fleet.
///
/// Produced on demand by the status cache. Individual records may reflect
/// polls taken at different instants, but no record is ever torn, and the
/// snapshot itself never changes after creation.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    records: BTreeMap<String, StatusRecord>,
}

impl FleetSnapshot {
    /// Creates a snapshot from already-copied records.
    pub fn new(records: BTreeMap<String, StatusRecord>) -> Self {
        Self {
            taken_at: Utc::now(),
            records,
        }
    }

    /// The record for one printer, if it is part of the snapshot.
    pub fn get(&self, name: &str) -> Option<&StatusRecord> {
        self.records.get(name)
    }

    /// Convenience accessor for a printer's state, `Unknown` if absent.
    pub fn state_of(&self, name: &str) -> PrinterState {
        self.records.get(name).map(|r| r.state).unwrap_or_default()
    }

    /// Iterates records in printer-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StatusRecord)> {
        self.records.iter()
    }

    /// Number of printers in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_unknown_and_unpolled() {
        let record = StatusRecord::default();

        assert_eq!(record.state, PrinterState::Unknown);
        assert!(record.last_updated.is_none());
        assert!(record.last_error.is_none());
        assert!(!record.has_been_polled());
    }

    #[test]
    fn test_polled_record_clears_error() {
        let record = StatusRecord::polled(PrinterState::Ready, None);

        assert_eq!(record.state, PrinterState::Ready);
        assert!(record.has_been_polled());
        assert!(record.last_error.is_none());
    }

    #[test]
    fn test_failed_record_keeps_error() {
        let record = StatusRecord::failed(PrinterState::Offline, "connection refused");

        assert_eq!(record.state, PrinterState::Offline);
        assert!(record.has_been_polled());
        assert_eq!(record.last_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_state_glyphs_are_distinct() {
        let states = [
            PrinterState::Printing,
            PrinterState::Ready,
            PrinterState::Offline,
            PrinterState::Unknown,
        ];

        for a in &states {
            for b in &states {
                if a != b {
                    assert_ne!(a.glyph(), b.glyph());
                    assert_ne!(a.label(), b.label());
                }
            }
        }
    }

    #[test]
    fn test_snapshot_ordering_and_lookup() {
        let mut records = BTreeMap::new();
        records.insert("zephyr".to_string(), StatusRecord::polled(PrinterState::Printing, None));
        records.insert("anvil".to_string(), StatusRecord::default());

        let snapshot = FleetSnapshot::new(records);

        let names: Vec<&str> = snapshot.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["anvil", "zephyr"]);

        assert_eq!(snapshot.state_of("zephyr"), PrinterState::Printing);
        assert_eq!(snapshot.state_of("anvil"), PrinterState::Unknown);
        assert_eq!(snapshot.state_of("missing"), PrinterState::Unknown);
        assert!(snapshot.get("missing").is_none());
        assert_eq!(snapshot.len(), 2);
    }
}
