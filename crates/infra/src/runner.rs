//! Background refresh loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::refresh::{refresh_snapshot, RefreshReport, RefreshSettings};
use crate::snapshot_store::SnapshotStore;
use crate::source::DashboardSource;

/// Source + store + settings: everything one refresh cycle touches.
#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn DashboardSource>,
    store: Arc<SnapshotStore>,
    settings: Arc<RefreshSettings>,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn DashboardSource>,
        store: Arc<SnapshotStore>,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            source,
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Run one cycle against the store's current snapshot and apply it.
    pub async fn refresh_once(&self, now: DateTime<Utc>) -> RefreshReport {
        let previous = self.store.snapshot();
        let outcome =
            refresh_snapshot(self.source.as_ref(), previous.as_ref(), &self.settings, now).await;
        let report = outcome.report.clone();
        self.store.apply(outcome);
        report
    }
}

#[derive(Debug, Clone)]
pub struct RefreshRunner {
    interval: Duration,
}

impl RefreshRunner {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(180);
    /// Floor for `interval`; `tokio::time::interval` panics on zero.
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(interval: Duration) -> Self {
        if interval < Self::MIN_INTERVAL {
            warn!(?interval, "refresh interval below one second; clamping");
        }
        Self {
            interval: interval.max(Self::MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the loop on the current tokio runtime.
    ///
    /// The first tick fires immediately, so the store is populated right
    /// after startup.
    pub fn spawn(self, refresher: Refresher) -> RefreshRunnerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        // Capacity 1: triggers that arrive while one is queued coalesce.
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let join = tokio::spawn(run_loop(self.interval, refresher, shutdown_rx, trigger_rx));
        info!(interval_secs = self.interval.as_secs(), "refresh runner started");

        RefreshRunnerHandle {
            shutdown: Some(shutdown_tx),
            trigger: trigger_tx,
            join: Some(join),
        }
    }
}

impl Default for RefreshRunner {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

async fn run_loop(
    period: Duration,
    refresher: Refresher,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut trigger_rx: mpsc::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => break,
            _ = ticker.tick() => {}
            Some(()) = trigger_rx.recv() => {
                debug!("manual refresh triggered");
                // A manual refresh restarts the schedule.
                ticker.reset();
            }
        }

        let report = refresher.refresh_once(Utc::now()).await;
        if !report.is_complete() {
            warn!(failed = report.failed.len(), "refresh completed with failed sections");
        }
    }
    info!("refresh runner stopped");
}

/// Handle to control a running [`RefreshRunner`].
#[derive(Debug)]
pub struct RefreshRunnerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    trigger: mpsc::Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl RefreshRunnerHandle {
    /// Ask for a refresh now. Returns `false` if one is already queued.
    pub fn trigger(&self) -> bool {
        self.trigger.try_send(()).is_ok()
    }

    /// Request graceful shutdown and wait for the loop to stop.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}
