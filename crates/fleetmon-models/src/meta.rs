//! Process-wide metadata, computed once at startup.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::printer::{BackendKind, Printer};

/// Read-only process metadata for `/info` and the startup message.
#[derive(Debug, Clone)]
pub struct ProcessMeta {
    /// Crate version of the running binary.
    pub version: String,
    /// Hostname of the machine running the monitor.
    pub hostname: String,
    /// When the process started.
    pub started_at: DateTime<Utc>,
    /// Number of configured printers.
    pub printer_count: usize,
    /// Configured printers per backend kind.
    pub backend_counts: BTreeMap<BackendKind, usize>,
}

impl ProcessMeta {
    /// Collects metadata for the given fleet. Called once at startup.
    pub fn collect(version: impl Into<String>, printers: &[Printer]) -> Self {
        let mut backend_counts = BTreeMap::new();
        for printer in printers {
            *backend_counts.entry(printer.backend).or_insert(0) += 1;
        }

        Self {
            version: version.into(),
            hostname: gethostname::gethostname().to_string_lossy().into_owned(),
            started_at: Utc::now(),
            printer_count: printers.len(),
            backend_counts,
        }
    }

    /// Uptime since process start.
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// Uptime rendered as `H:MM:SS h` or `MM:SS min`.
    pub fn uptime_hms(&self) -> String {
        let total = self.uptime().num_seconds().max(0);
        let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
        if h > 0 {
            format!("{}:{:02}:{:02} h", h, m, s)
        } else {
            format!("{:02}:{:02} min", m, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_counts_backends() {
        let printers = vec![
            Printer::new("a", BackendKind::Moonraker, "a.local"),
            Printer::new("b", BackendKind::OctoPrint, "b.local"),
            Printer::new("c", BackendKind::Moonraker, "c.local"),
        ];

        let meta = ProcessMeta::collect("1.2.3", &printers);

        assert_eq!(meta.version, "1.2.3");
        assert_eq!(meta.printer_count, 3);
        assert_eq!(meta.backend_counts[&BackendKind::Moonraker], 2);
        assert_eq!(meta.backend_counts[&BackendKind::OctoPrint], 1);
        assert!(!meta.hostname.is_empty());
    }

    #[test]
    fn test_collect_empty_fleet() {
        let meta = ProcessMeta::collect("0.1.0", &[]);

        assert_eq!(meta.printer_count, 0);
        assert!(meta.backend_counts.is_empty());
    }

    #[test]
    fn test_uptime_format() {
        let mut meta = ProcessMeta::collect("0.1.0", &[]);

        meta.started_at = Utc::now() - chrono::Duration::seconds(75);
        assert_eq!(meta.uptime_hms(), "01:15 min");

        meta.started_at = Utc::now() - chrono::Duration::seconds(3 * 3600 + 62);
        assert_eq!(meta.uptime_hms(), "3:01:02 h");
    }
}
