//! Adapters connecting Fleetmon to the outside world.
//!
//! Three capability seams, each a small async trait:
//!
//! - [`StatusSource`] - fetch one printer's raw status (Moonraker, OctoPrint)
//! - [`PowerControl`] - query and switch a printer's smart plug (Tasmota)
//! - [`MessagingSink`] / [`CommandSource`] - outbound notifications and
//!   inbound chat commands (implemented by the Telegram transport crate)
//!
//! The vendor clients in this crate speak plain HTTP with a bounded
//! per-request timeout and never retry; retry policy belongs to the poller.
//! Classifying raw replies into the four normalized printer states is not
//! done here either - adapters report what the backend said, the runtime's
//! normalizer decides what it means.

pub mod error;
pub mod messaging;
pub mod moonraker;
pub mod octoprint;
pub mod registry;
pub mod tasmota;
pub mod traits;

pub use error::{AdapterError, Result, SinkError};
pub use messaging::{CommandSource, InboundCommand, MessagingSink};
pub use moonraker::MoonrakerClient;
pub use octoprint::OctoPrintClient;
pub use registry::{power_control_for, status_source_for};
pub use tasmota::TasmotaPlug;
pub use traits::{PowerControl, PowerState, RawStatus, StatusSource};
