//! Latest snapshot + alert board, shared between the refresh loop and HTTP.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use posdash_alerts::{Alert, AlertBoard, AlertCounts, AlertId, Category, Severity};
use posdash_metrics::{MetricSnapshot, Section};

use crate::refresh::{RefreshOutcome, RefreshReport, SectionFailure};

/// Broadcast after every applied refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshNotice {
    pub captured_at: DateTime<Utc>,
    pub refreshed: Vec<Section>,
    pub failed: Vec<SectionFailure>,
    pub active_alerts: usize,
    pub counts: AlertCounts,
}

#[derive(Debug, Default)]
struct State {
    snapshot: Option<MetricSnapshot>,
    board: AlertBoard,
    last_report: Option<RefreshReport>,
}

/// Shared, in-process dashboard state.
///
/// Readers clone out of the lock; nothing holds the guard across an await.
#[derive(Debug)]
pub struct SnapshotStore {
    state: RwLock<State>,
    notices: broadcast::Sender<RefreshNotice>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        // Lossy: slow subscribers skip notices rather than stall refreshes.
        let (notices, _rx) = broadcast::channel(64);
        Self {
            state: RwLock::new(State::default()),
            notices,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Install a refresh outcome and notify subscribers.
    pub fn apply(&self, outcome: RefreshOutcome) -> RefreshNotice {
        let notice = {
            let mut state = self.write();
            state.board.replace(outcome.alerts);
            let counts = state.board.counts();
            let notice = RefreshNotice {
                captured_at: outcome.snapshot.captured_at,
                refreshed: outcome.report.refreshed.clone(),
                failed: outcome.report.failed.clone(),
                active_alerts: counts.total,
                counts,
            };
            state.snapshot = Some(outcome.snapshot);
            state.last_report = Some(outcome.report);
            notice
        };

        // No receivers is fine.
        let receivers = self.notices.send(notice.clone()).unwrap_or(0);
        debug!(receivers, "refresh notice sent");
        notice
    }

    /// `None` until the first refresh has been applied.
    pub fn snapshot(&self) -> Option<MetricSnapshot> {
        self.read().snapshot.clone()
    }

    pub fn last_report(&self) -> Option<RefreshReport> {
        self.read().last_report.clone()
    }

    /// Active alerts in evaluation order, optionally narrowed.
    pub fn active_alerts(
        &self,
        severity: Option<Severity>,
        category: Option<Category>,
    ) -> Vec<Alert> {
        self.read()
            .board
            .active()
            .filter(|a| severity.is_none_or(|s| a.severity == s))
            .filter(|a| category.is_none_or(|c| a.category == c))
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> AlertCounts {
        self.read().board.counts()
    }

    /// `false` when no alert with that id is currently active.
    pub fn dismiss(&self, id: &AlertId) -> bool {
        self.write().board.dismiss(id)
    }

    pub fn restore_all(&self) -> usize {
        self.write().board.restore_all()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshNotice> {
        self.notices.subscribe()
    }
}
