//! Core data models for Fleetmon.
//!
//! This crate defines the shared vocabulary of the fleet monitor:
//!
//! - [`Printer`] and [`BackendKind`] - the configured fleet, immutable for
//!   the lifetime of the process
//! - [`PrinterState`] and [`StatusRecord`] - the normalized per-printer
//!   status written by the poller
//! - [`FleetSnapshot`] - an immutable, consistent multi-printer view
//! - [`ProcessMeta`] - process-wide metadata for `/info` and startup messages
//! - [`NotificationEvent`] - an outbound message on its way to the sink
//!
//! All types are plain data; behavior (polling, caching, rendering) lives in
//! `fleetmon-runtime`.

pub mod meta;
pub mod notification;
pub mod printer;
pub mod status;

pub use meta::ProcessMeta;
pub use notification::{ChatTarget, NotificationEvent, NotificationKind};
pub use printer::{BackendKind, Printer};
pub use status::{FleetSnapshot, PrinterState, StatusRecord};
