//! Concurrency-safe store of the latest status per printer.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use tracing::warn;

use fleetmon_models::{FleetSnapshot, StatusRecord};

/// The fleet status cache.
///
/// One `RwLock<StatusRecord>` per configured printer. The printer set is
/// immutable for the process lifetime, so the map itself is never locked -
/// readers never block each other and writers for different printers never
/// contend. Every configured printer has a record from construction on
/// (`Unknown`, no timestamp) so readers never see an absent entry.
pub struct FleetCache {
    entries: HashMap<String, RwLock<StatusRecord>>,
}

impl FleetCache {
    /// Creates a cache for the given printer names, all initially `Unknown`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(|name| (name.into(), RwLock::new(StatusRecord::default())))
            .collect();

        Self { entries }
    }

    /// Overwrites one printer's record (last-writer-wins per key).
    ///
    /// Writes for names that were never configured are dropped with a
    /// warning; the printer set cannot grow at runtime.
    pub async fn update(&self, name: &str, record: StatusRecord) {
        match self.entries.get(name) {
            Some(slot) => *slot.write().await = record,
            None => warn!(printer = %name, "dropping status update for unconfigured printer"),
        }
    }

    /// The latest record for one printer, `None` only for unconfigured names.
    pub async fn get(&self, name: &str) -> Option<StatusRecord> {
        match self.entries.get(name) {
            Some(slot) => Some(slot.read().await.clone()),
            None => None,
        }
    }

    /// A consistent copy-on-read view of the whole fleet.
    ///
    /// Per-printer records are copied under their read lock, so no record is
    /// ever torn; records of different printers may stem from different poll
    /// instants.
    pub async fn snapshot(&self) -> FleetSnapshot {
        let mut records = BTreeMap::new();
        for (name, slot) in &self.entries {
            records.insert(name.clone(), slot.read().await.clone());
        }
        FleetSnapshot::new(records)
    }

    /// Whether a printer name is part of the configured fleet.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of configured printers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the fleet is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
