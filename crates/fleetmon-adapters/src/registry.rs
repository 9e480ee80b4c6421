//! Adapter selection per configured backend kind.

use std::time::Duration;

use fleetmon_models::{BackendKind, Printer};

use crate::error::Result;
use crate::moonraker::MoonrakerClient;
use crate::octoprint::OctoPrintClient;
use crate::tasmota::{TasmotaPlug, DEFAULT_PLUG_TIMEOUT};
use crate::traits::{PowerControl, StatusSource};

/// Builds the status source for a printer's configured backend.
pub fn status_source_for(printer: &Printer, timeout: Duration) -> Result<Box<dyn StatusSource>> {
    let base_url = printer.base_url();

    match printer.backend {
        BackendKind::Moonraker => Ok(Box::new(MoonrakerClient::new(
            base_url,
            printer.token.clone(),
            timeout,
        )?)),
        BackendKind::OctoPrint => Ok(Box::new(OctoPrintClient::new(
            base_url,
            printer.api_key.clone(),
            timeout,
        )?)),
    }
}

/// Builds the power control for a printer's plug, if one is configured.
pub fn power_control_for(printer: &Printer) -> Result<Option<Box<dyn PowerControl>>> {
    match &printer.plug_host {
        Some(host) => {
            let plug = TasmotaPlug::new(host.clone(), DEFAULT_PLUG_TIMEOUT)?;
            Ok(Some(Box::new(plug)))
        }
        None => Ok(None),
    }
}
