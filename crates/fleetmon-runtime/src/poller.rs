//! Fleet poller: one pass over all configured printers per interval.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, trace, warn};

use fleetmon_adapters::StatusSource;
use fleetmon_models::{Printer, PrinterState};

use crate::cache::FleetCache;
use crate::config::FleetConfig;
use crate::normalize::normalize;

/// One printer together with its status source.
pub struct PollTarget {
    /// The configured printer.
    pub printer: Printer,
    /// Adapter for the printer's backend.
    pub source: Box<dyn StatusSource>,
}

impl PollTarget {
    /// Pairs a printer with its status source.
    pub fn new(printer: Printer, source: Box<dyn StatusSource>) -> Self {
        Self { printer, source }
    }
}

/// Polls every backend on a fixed interval and writes normalized records
/// into the fleet cache.
pub struct FleetPoller {
    targets: Vec<PollTarget>,
    cache: Arc<FleetCache>,
    poll_interval: Duration,
    /// Shutdown signal receiver.
    shutdown: watch::Receiver<bool>,
}

impl FleetPoller {
    /// Creates a poller for the given targets.
    pub fn new(
        targets: Vec<PollTarget>,
        cache: Arc<FleetCache>,
        config: &FleetConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            targets,
            cache,
            poll_interval: config.poll_interval,
            shutdown,
        }
    }

    /// Run the polling loop until the shutdown signal.
    ///
    /// The shutdown channel is re-checked at the top of every cycle; an
    /// in-flight cycle finishes (bounded by the adapter timeouts), no new
    /// cycle starts afterwards.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.poll_interval);

        debug!(
            poll_interval_ms = self.poll_interval.as_millis(),
            printers = self.targets.len(),
            "starting fleet poller"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_cycle().await;
                }
                _ = self.shutdown.changed() => {
                    if *self.shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("fleet poller stopped");
    }

    /// Poll all printers once, concurrently.
    ///
    /// Per-printer isolation: every fetch outcome - including unreachable
    /// and malformed replies - is normalized into a status record, so no
    /// failure escapes the cycle or affects another printer's slot.
    async fn poll_cycle(&self) {
        let polls = self.targets.iter().map(|target| async {
            trace!(printer = %target.printer.name, "polling backend");

            let outcome = target.source.fetch_status().await;
            let record = normalize(target.printer.backend, outcome);

            if record.state == PrinterState::Offline || record.state == PrinterState::Unknown {
                if let Some(error) = &record.last_error {
                    warn!(
                        printer = %target.printer.name,
                        state = %record.state,
                        error = %error,
                        "poll failed"
                    );
                }
            }

            self.cache.update(&target.printer.name, record).await;
        });

        join_all(polls).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fleetmon_adapters::{AdapterError, RawStatus};
    use fleetmon_models::BackendKind;

    struct FixedSource {
        state_text: &'static str,
    }

    #[async_trait]
    impl StatusSource for FixedSource {
        async fn fetch_status(&self) -> fleetmon_adapters::Result<RawStatus> {
            Ok(RawStatus::new(self.state_text))
        }
    }

    struct UnreachableSource;

    #[async_trait]
    impl StatusSource for UnreachableSource {
        async fn fetch_status(&self) -> fleetmon_adapters::Result<RawStatus> {
            Err(AdapterError::Unreachable("connection refused".into()))
        }
    }

    struct SlowSource {
        delay: Duration,
    }

    #[async_trait]
    impl StatusSource for SlowSource {
        async fn fetch_status(&self) -> fleetmon_adapters::Result<RawStatus> {
            tokio::time::sleep(self.delay).await;
            Ok(RawStatus::new("standby"))
        }
    }

    fn target(name: &str, backend: BackendKind, source: Box<dyn StatusSource>) -> PollTarget {
        PollTarget::new(Printer::new(name, backend, format!("{}.local", name)), source)
    }

    fn test_config() -> FleetConfig {
        FleetConfig::new().with_poll_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_one_cycle_mixed_fleet() {
        // A reachable/idle, B unreachable, C reachable/printing
        let targets = vec![
            target("a", BackendKind::Moonraker, Box::new(FixedSource { state_text: "standby" })),
            target("b", BackendKind::OctoPrint, Box::new(UnreachableSource)),
            target("c", BackendKind::Moonraker, Box::new(FixedSource { state_text: "printing" })),
        ];
        let cache = Arc::new(FleetCache::new(["a", "b", "c"]));
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let poller = FleetPoller::new(targets, Arc::clone(&cache), &test_config(), shutdown_rx);
        poller.poll_cycle().await;

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.state_of("a"), PrinterState::Ready);
        assert_eq!(snapshot.state_of("b"), PrinterState::Offline);
        assert_eq!(snapshot.state_of("c"), PrinterState::Printing);

        // the failed printer carries an error, the others do not
        assert!(snapshot.get("b").unwrap().last_error.is_some());
        assert!(snapshot.get("a").unwrap().last_error.is_none());
    }

    #[tokio::test]
    async fn test_failure_isolation() {
        // the unreachable printer must not prevent the healthy one from
        // being updated in the same cycle
        let targets = vec![
            target("bad", BackendKind::Moonraker, Box::new(UnreachableSource)),
            target("good", BackendKind::Moonraker, Box::new(FixedSource { state_text: "printing" })),
        ];
        let cache = Arc::new(FleetCache::new(["bad", "good"]));
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let poller = FleetPoller::new(targets, Arc::clone(&cache), &test_config(), shutdown_rx);
        poller.poll_cycle().await;

        assert_eq!(
            cache.get("good").await.unwrap().state,
            PrinterState::Printing
        );
        assert_eq!(cache.get("bad").await.unwrap().state, PrinterState::Offline);
    }

    #[tokio::test]
    async fn test_slow_backend_does_not_block_others_within_cycle() {
        let targets = vec![
            target("slow", BackendKind::Moonraker, Box::new(SlowSource { delay: Duration::from_millis(200) })),
            target("fast", BackendKind::Moonraker, Box::new(FixedSource { state_text: "standby" })),
        ];
        let cache = Arc::new(FleetCache::new(["slow", "fast"]));
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let poller = FleetPoller::new(targets, Arc::clone(&cache), &test_config(), shutdown_rx);

        let cycle = tokio::spawn(async move { poller.poll_cycle().await });

        // the fast printer's record lands while the slow one is still pending
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.get("fast").await.unwrap().state, PrinterState::Ready);
        assert!(!cache.get("slow").await.unwrap().has_been_polled());

        cycle.await.unwrap();
        assert_eq!(cache.get("slow").await.unwrap().state, PrinterState::Ready);
    }

    #[tokio::test]
    async fn test_poller_corrects_state_on_next_cycle() {
        // no retries within a cycle; a new cycle overwrites the bad record
        let targets = vec![target(
            "a",
            BackendKind::Moonraker,
            Box::new(FixedSource { state_text: "standby" }),
        )];
        let cache = Arc::new(FleetCache::new(["a"]));
        cache
            .update(
                "a",
                fleetmon_models::StatusRecord::failed(PrinterState::Offline, "stale"),
            )
            .await;

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = FleetPoller::new(targets, Arc::clone(&cache), &test_config(), shutdown_rx);
        poller.poll_cycle().await;

        let record = cache.get("a").await.unwrap();
        assert_eq!(record.state, PrinterState::Ready);
        assert!(record.last_error.is_none());
    }

    #[tokio::test]
    async fn test_poller_shutdown() {
        let targets = vec![target(
            "a",
            BackendKind::Moonraker,
            Box::new(FixedSource { state_text: "standby" }),
        )];
        let cache = Arc::new(FleetCache::new(["a"]));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut poller = FleetPoller::new(targets, cache, &test_config(), shutdown_rx);

        let handle = tokio::spawn(async move {
            poller.run().await;
        });

        // let it run a few cycles
        tokio::time::sleep(Duration::from_millis(50)).await;

        shutdown_tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_millis(500), handle).await;
        assert!(result.is_ok(), "poller should stop after shutdown signal");
    }
}
