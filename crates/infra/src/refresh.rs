//! One refresh cycle: fetch every section, keep what failed, re-evaluate alerts.

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::Serialize;
use tracing::{info, warn};

use posdash_alerts::{evaluate, Alert, AlertThresholds, EvalContext};
use posdash_metrics::{MetricSnapshot, ReportWindow, Section};

use crate::fetch::{
    fetch_customer_insights, fetch_financial_health, fetch_inventory_analytics,
    fetch_operations_metrics, fetch_sales_intelligence,
};
use crate::source::{DashboardSource, SourceError};

/// What a refresh needs besides the rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSettings {
    pub daily_target: f64,
    /// Store-local offset used for day/week/month boundaries and hours.
    pub utc_offset: FixedOffset,
    pub thresholds: AlertThresholds,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            daily_target: 5_000.0,
            utc_offset: Utc.fix(),
            thresholds: AlertThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionFailure {
    pub section: Section,
    pub error: String,
}

/// Outcome summary of one refresh cycle.
///
/// `finished_at` is `started_at` plus the cycle's duration on the tokio
/// clock, so a paused test clock yields `finished_at == started_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub refreshed: Vec<Section>,
    pub failed: Vec<SectionFailure>,
    pub alert_count: usize,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub snapshot: MetricSnapshot,
    pub alerts: Vec<Alert>,
    pub report: RefreshReport,
}

/// Run all five section fetches concurrently and merge them over `previous`.
///
/// A section whose fetch fails keeps its previous value (or the all-zero
/// default when nothing was loaded yet) and is listed in the report. There is
/// no retry; the next cycle tries again.
///
/// Every timestamp derives from `now`; the wall clock is never read.
pub async fn refresh_snapshot<S>(
    source: &S,
    previous: Option<&MetricSnapshot>,
    settings: &RefreshSettings,
    now: DateTime<Utc>,
) -> RefreshOutcome
where
    S: DashboardSource + ?Sized,
{
    let started = tokio::time::Instant::now();
    let window = ReportWindow::at(now, settings.utc_offset);
    let (sales, inventory, customers, operations, financial) = tokio::join!(
        fetch_sales_intelligence(source, &window, settings.daily_target),
        fetch_inventory_analytics(source, &window),
        fetch_customer_insights(source, &window),
        fetch_operations_metrics(source, &window),
        fetch_financial_health(source, &window),
    );

    let mut snapshot = previous
        .cloned()
        .unwrap_or_else(|| MetricSnapshot::empty(now));
    snapshot.captured_at = now;

    let mut report = RefreshReport {
        started_at: now,
        finished_at: now,
        refreshed: Vec::new(),
        failed: Vec::new(),
        alert_count: 0,
    };
    settle(&mut report, Section::Sales, sales, &mut snapshot.sales);
    settle(&mut report, Section::Inventory, inventory, &mut snapshot.inventory);
    settle(&mut report, Section::Customers, customers, &mut snapshot.customers);
    settle(&mut report, Section::Operations, operations, &mut snapshot.operations);
    settle(&mut report, Section::Financial, financial, &mut snapshot.financial);

    let alerts = evaluate(&snapshot, &settings.thresholds, &EvalContext::from(&window));
    report.alert_count = alerts.len();
    let elapsed = Duration::from_std(started.elapsed()).unwrap_or_else(|_| Duration::zero());
    report.finished_at = now + elapsed;
    info!(
        refreshed = report.refreshed.len(),
        failed = report.failed.len(),
        alerts = report.alert_count,
        "dashboard refreshed"
    );

    RefreshOutcome {
        snapshot,
        alerts,
        report,
    }
}

fn settle<T>(
    report: &mut RefreshReport,
    section: Section,
    result: Result<T, SourceError>,
    slot: &mut T,
) {
    match result {
        Ok(value) => {
            *slot = value;
            report.refreshed.push(section);
        }
        Err(err) => {
            warn!(section = section.as_str(), error = %err, "section fetch failed; keeping previous values");
            report.failed.push(SectionFailure {
                section,
                error: err.to_string(),
            });
        }
    }
}
