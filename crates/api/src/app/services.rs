use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::warn;

use posdash_infra::{
    DashboardConfig, DashboardSource, InMemoryDashboardSource, PostgresDashboardSource,
    RefreshReport, RefreshRunner, RefreshRunnerHandle, Refresher, SnapshotStore,
};

/// How long `POST /refresh` waits for the runner to finish a cycle.
const REFRESH_WAIT: Duration = Duration::from_secs(30);

/// Shared state behind every handler.
pub struct AppServices {
    refresher: Refresher,
    runner: Mutex<Option<RefreshRunnerHandle>>,
}

impl AppServices {
    /// Wire the store and start the background refresh loop.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(source: Arc<dyn DashboardSource>, config: &DashboardConfig) -> Self {
        let store = Arc::new(SnapshotStore::new());
        let refresher = Refresher::new(source, store, config.settings.clone());
        let runner = RefreshRunner::new(config.refresh_interval).spawn(refresher.clone());
        Self {
            refresher,
            runner: Mutex::new(Some(runner)),
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        self.refresher.store()
    }

    /// Refresh now and return the report of a cycle that started after the call.
    ///
    /// Goes through the runner so concurrent requests coalesce into one
    /// cycle. Once the runner is stopped, refreshes inline instead.
    pub async fn refresh_now(&self) -> Option<RefreshReport> {
        let requested_at = Utc::now();
        let mut notices = self.store().subscribe();

        let running = {
            let runner = self.runner.lock().unwrap_or_else(|p| p.into_inner());
            // `false` means a refresh is already queued; its notice serves us too.
            runner.as_ref().map(|handle| handle.trigger()).is_some()
        };
        if !running {
            return Some(self.refresher.refresh_once(Utc::now()).await);
        }

        let wait = async {
            loop {
                match notices.recv().await {
                    Ok(notice) if notice.captured_at >= requested_at => {
                        return self.store().last_report();
                    }
                    // A cycle that was already running when we asked.
                    Ok(_) | Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => return None,
                }
            }
        };
        match tokio::time::timeout(REFRESH_WAIT, wait).await {
            Ok(report) => report,
            Err(_) => {
                warn!(wait_secs = REFRESH_WAIT.as_secs(), "manual refresh timed out");
                None
            }
        }
    }

    /// Stop the refresh loop; later calls are no-ops.
    pub async fn shutdown(&self) {
        let handle = self.runner.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
    }
}

/// Pick the row source from configuration.
pub async fn connect_source(config: &DashboardConfig) -> anyhow::Result<Arc<dyn DashboardSource>> {
    let source: Arc<dyn DashboardSource> = match &config.database_url {
        Some(url) => Arc::new(PostgresDashboardSource::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set; serving generated demo data");
            Arc::new(InMemoryDashboardSource::demo(Utc::now()))
        }
    };
    Ok(source)
}

/// SSE stream of refresh notices (event name `refresh`).
pub fn notice_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.store().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(notice) => {
            let data = serde_json::to_string(&notice).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event("refresh").data(data)))
        }
        // Lagged: skip what was missed, the next notice carries full counts.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
