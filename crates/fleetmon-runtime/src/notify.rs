//! Notification rendering and dispatch.
//!
//! All rendering reads a [`FleetSnapshot`], never individual cache entries,
//! so a single message is internally consistent-at-read-time.

use std::sync::Arc;

use tracing::{debug, warn};

use fleetmon_adapters::MessagingSink;
use fleetmon_models::{
    ChatTarget, FleetSnapshot, NotificationEvent, NotificationKind, Printer, ProcessMeta,
    StatusRecord,
};

/// Startup message: version + start time.
pub fn render_startup(meta: &ProcessMeta) -> String {
    format!(
        "🚀 Fleetmon v{} started on {} at {}.",
        meta.version,
        meta.hostname,
        meta.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Fleet overview: one bullet per printer with glyph, label and detail.
pub fn render_overview(printers: &[Printer], snapshot: &FleetSnapshot) -> String {
    if printers.is_empty() {
        return "ℹ️ No printers configured.".to_string();
    }

    let mut lines = vec!["🖨️ Printer overview:".to_string()];
    for printer in printers {
        lines.push(format!(
            "• {} ({} @ {}) – {}",
            printer.name,
            printer.backend,
            printer.host,
            status_fragment(snapshot.get(&printer.name))
        ));
    }
    lines.join("\n")
}

/// `/status` reply: one line per printer with name, backend kind, endpoint
/// and status glyph.
pub fn render_status(printers: &[Printer], snapshot: &FleetSnapshot) -> String {
    if printers.is_empty() {
        return "ℹ️ No printers configured.".to_string();
    }

    printers
        .iter()
        .map(|printer| {
            format!(
                "{} {} — {} @ {} — {}",
                snapshot.state_of(&printer.name).glyph(),
                printer.name,
                printer.backend,
                printer.endpoint(),
                status_fragment(snapshot.get(&printer.name))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `/info` reply: version, host, uptime, fleet composition.
pub fn render_info(meta: &ProcessMeta, snapshot: &FleetSnapshot) -> String {
    let backends = if meta.backend_counts.is_empty() {
        "none".to_string()
    } else {
        meta.backend_counts
            .iter()
            .map(|(kind, count)| format!("{}: {}", kind, count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let polled = snapshot.iter().filter(|(_, r)| r.has_been_polled()).count();

    format!(
        "ℹ️ Fleetmon v{}\nHost: {}\nUptime: {}\nPrinters: {} ({})\nPolled at least once: {}/{}",
        meta.version,
        meta.hostname,
        meta.uptime_hms(),
        meta.printer_count,
        backends,
        polled,
        snapshot.len()
    )
}

/// Glyph + label + optional detail or error for one record.
fn status_fragment(record: Option<&StatusRecord>) -> String {
    let Some(record) = record else {
        return "❓ Unknown".to_string();
    };

    let mut fragment = format!("{} {}", record.state.glyph(), record.state.label());

    if !record.has_been_polled() {
        fragment.push_str(" (not polled yet)");
    } else if let Some(detail) = &record.detail {
        fragment.push_str(&format!(" – {}", detail));
    } else if let Some(error) = &record.last_error {
        fragment.push_str(&format!(" – {}", error));
    }

    fragment
}

/// Sends rendered messages to the configured chat.
///
/// Delivery failures are logged and swallowed: a broken sink must never
/// affect the cache or the poller.
pub struct Notifier {
    sink: Arc<dyn MessagingSink>,
    chat: ChatTarget,
}

impl Notifier {
    /// Creates a notifier for one chat.
    pub fn new(sink: Arc<dyn MessagingSink>, chat: ChatTarget) -> Self {
        Self { sink, chat }
    }

    /// Sends the one-shot startup message.
    pub async fn send_startup(&self, meta: &ProcessMeta) {
        self.send(NotificationKind::Startup, render_startup(meta)).await;
    }

    /// Sends a fleet overview built from a fresh snapshot.
    pub async fn send_overview(&self, printers: &[Printer], snapshot: &FleetSnapshot) {
        self.send(
            NotificationKind::PeriodicSummary,
            render_overview(printers, snapshot),
        )
        .await;
    }

    async fn send(&self, kind: NotificationKind, text: String) {
        let event = NotificationEvent::new(kind, self.chat, text);
        match self.sink.send(event).await {
            Ok(()) => debug!(chat = %self.chat, ?kind, "notification sent"),
            Err(e) => warn!(chat = %self.chat, ?kind, error = %e, "notification delivery failed"),
        }
    }
}
