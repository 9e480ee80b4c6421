//! Fleet runtime: owns the shutdown signal and supervises all tasks.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use fleetmon_models::{Printer, ProcessMeta};

use crate::cache::FleetCache;
use crate::commands::CommandLoop;
use crate::config::FleetConfig;
use crate::error::{Result, RuntimeError};
use crate::notify::Notifier;
use crate::poller::FleetPoller;

/// Supervises the poller, the command loop and the startup notifications.
///
/// All supervised tasks share one `watch` cancellation channel. `shutdown`
/// raises it and joins every task under a bounded timeout; a task that does
/// not return in time is abandoned rather than blocking process exit.
pub struct FleetRuntime {
    config: FleetConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    started: bool,
}

impl FleetRuntime {
    /// Creates a runtime with the given configuration.
    pub fn new(config: FleetConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
            started: false,
        }
    }

    /// A receiver of the shared shutdown signal, for wiring into the poller
    /// and command loop before `start`.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Starts the poller, the command loop and the startup-notification
    /// sequence as independent tasks.
    pub fn start(
        &mut self,
        poller: FleetPoller,
        command_loop: CommandLoop,
        notifier: Notifier,
        printers: Arc<Vec<Printer>>,
        cache: Arc<FleetCache>,
        meta: Arc<ProcessMeta>,
    ) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }

        info!("starting fleet runtime");

        let mut poller = poller;
        self.tasks.push((
            "poller",
            tokio::spawn(async move { poller.run().await }),
        ));

        let mut command_loop = command_loop;
        self.tasks.push((
            "command-loop",
            tokio::spawn(async move { command_loop.run().await }),
        ));

        let delays = (
            self.config.first_overview_delay,
            self.config.second_overview_delay,
        );
        let shutdown_rx = self.shutdown_rx.clone();
        self.tasks.push((
            "startup-notifications",
            tokio::spawn(async move {
                run_startup_notifications(notifier, printers, cache, meta, delays, shutdown_rx)
                    .await;
            }),
        ));

        self.started = true;
        debug!(tasks = self.tasks.len(), "fleet runtime started");

        Ok(())
    }

    /// Raises the shutdown signal and joins all tasks, each under the
    /// configured timeout.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down fleet runtime");

        self.shutdown_tx
            .send(true)
            .map_err(|e| RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e)))?;

        for (name, mut handle) in self.tasks.drain(..) {
            match timeout(self.config.shutdown_timeout, &mut handle).await {
                Ok(Ok(())) => debug!(task = name, "task stopped"),
                Ok(Err(e)) => warn!(task = name, error = %e, "task panicked during shutdown"),
                Err(_) => {
                    warn!(task = name, "task did not stop within timeout, aborting");
                    handle.abort();
                }
            }
        }

        self.started = false;
        info!("fleet runtime stopped");

        Ok(())
    }

    /// Whether the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for FleetRuntime {
    fn drop(&mut self) {
        // backstop: make sure supervised tasks see the signal
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}

/// Startup message immediately, then the two delayed fleet overviews.
///
/// The first overview (default 10s) may still show printers as Unknown; the
/// second (default 60s, after at least one full poll interval) is the one
/// operators should trust as complete. Each wait races the shutdown signal.
async fn run_startup_notifications(
    notifier: Notifier,
    printers: Arc<Vec<Printer>>,
    cache: Arc<FleetCache>,
    meta: Arc<ProcessMeta>,
    (first_delay, second_delay): (std::time::Duration, std::time::Duration),
    mut shutdown: watch::Receiver<bool>,
) {
    notifier.send_startup(&meta).await;

    let waits = [first_delay, second_delay.saturating_sub(first_delay)];
    for wait in waits {
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    debug!("startup notifications cancelled by shutdown");
                    return;
                }
            }
        }

        let snapshot = cache.snapshot().await;
        notifier.send_overview(&printers, &snapshot).await;
    }

    debug!("startup notification sequence finished");
}
