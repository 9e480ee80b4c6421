//! Status normalization: raw backend replies to the four fleet states.

use fleetmon_adapters::{AdapterError, RawStatus};
use fleetmon_models::{BackendKind, PrinterState, StatusRecord};

/// State texts that mean a job is active. "paused" counts: a job is loaded
/// and the machine is not free.
const PRINTING_WORDS: &[&str] = &["printing", "busy", "processing", "paused", "pausing", "resuming"];

/// State texts that mean the machine is reachable and free. Finished and
/// cancelled jobs leave the machine idle.
const READY_WORDS: &[&str] = &[
    "standby",
    "ready",
    "idle",
    "operational",
    "complete",
    "cancelled",
    "finished",
    "done",
];

/// State texts where the backend itself reports the printer as gone
/// (e.g. OctoPrint with a closed serial port).
const OFFLINE_WORDS: &[&str] = &["offline", "closed", "disconnected", "error"];

/// Maps one poll outcome onto a status record.
///
/// Mapping policy: an explicit printing/busy signal becomes `Printing`,
/// explicit ready/idle becomes `Ready`, an unreachable backend becomes
/// `Offline`, and anything the mapper cannot classify - a protocol error or
/// an unrecognized state text - becomes `Unknown`, never `Ready`. Operators
/// can therefore always distinguish "could not reach" from "reached but
/// confusing reply".
pub fn normalize(
    kind: BackendKind,
    outcome: std::result::Result<RawStatus, AdapterError>,
) -> StatusRecord {
    match outcome {
        Ok(raw) => {
            let state = classify(kind, &raw.state_text);
            match state {
                Some(state) => StatusRecord::polled(state, detail_for(&raw, state)),
                None => {
                    let mut record = StatusRecord::failed(
                        PrinterState::Unknown,
                        format!("unrecognized backend state '{}'", raw.state_text),
                    );
                    record.detail = raw.job;
                    record
                }
            }
        }
        Err(AdapterError::Unreachable(msg)) => StatusRecord::failed(PrinterState::Offline, msg),
        Err(err) => StatusRecord::failed(PrinterState::Unknown, err.to_string()),
    }
}

/// Word-level classification of a backend state text.
///
/// Moonraker reports a fixed `print_stats.state` vocabulary; OctoPrint
/// reports free-form strings ("Printing from SD", "Error (...)"), so for
/// OctoPrint substring matching is applied as well.
fn classify(kind: BackendKind, state_text: &str) -> Option<PrinterState> {
    let matches = |words: &[&str]| -> bool {
        match kind {
            BackendKind::Moonraker => words.contains(&state_text),
            BackendKind::OctoPrint => words.iter().any(|w| state_text.contains(w)),
        }
    };

    if matches(PRINTING_WORDS) {
        Some(PrinterState::Printing)
    } else if matches(OFFLINE_WORDS) {
        Some(PrinterState::Offline)
    } else if matches(READY_WORDS) {
        Some(PrinterState::Ready)
    } else {
        None
    }
}

/// Job name plus progress percent while printing.
fn detail_for(raw: &RawStatus, state: PrinterState) -> Option<String> {
    let job = raw.job.as_ref()?;
    if state == PrinterState::Printing {
        if let Some(progress) = raw.progress {
            let pct = (progress.clamp(0.0, 1.0) * 100.0 * 10.0).round() / 10.0;
            return Some(format!("{} ({:.1}%)", job, pct));
        }
    }
    Some(job.clone())
}
