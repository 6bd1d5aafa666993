//! Operations metrics: layby book and till throughput.

use serde::{Deserialize, Serialize};

use crate::rows::{LaybyRow, LaybyStatus, SaleRow, SaleStatus};
use crate::window::ReportWindow;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationsMetrics {
    pub active_laybys: u64,
    pub overdue_laybys: u64,
    /// Balance still owed across open (active or overdue) laybys.
    pub outstanding_balance: f64,
    pub completed_laybys_this_month: u64,
    /// Sales still `pending` this month.
    pub pending_sales: u64,
    pub voided_today: u64,
    pub transactions_per_hour: f64,
}

pub fn operations_metrics(
    window: &ReportWindow,
    laybys: &[LaybyRow],
    sales: &[SaleRow],
) -> OperationsMetrics {
    let today = window.today();
    let month = window.month_to_date();
    let mut out = OperationsMetrics::default();

    for layby in laybys {
        if layby.status == LaybyStatus::Active {
            out.active_laybys += 1;
        }
        if layby.is_overdue(window.today_start) {
            out.overdue_laybys += 1;
        }
        if layby.status.is_open() {
            out.outstanding_balance += layby.balance();
        }
        if layby.status == LaybyStatus::Completed
            && layby.completed_at.is_some_and(|at| month.contains(at))
        {
            out.completed_laybys_this_month += 1;
        }
    }

    let mut completed_today = 0u64;
    for sale in sales {
        match sale.status {
            SaleStatus::Pending if month.contains(sale.created_at) => out.pending_sales += 1,
            SaleStatus::Voided if today.contains(sale.created_at) => out.voided_today += 1,
            SaleStatus::Completed if today.contains(sale.created_at) => completed_today += 1,
            _ => {}
        }
    }

    // The first hour of trading counts as a full hour.
    let hours = window.elapsed_hours_today().max(1.0);
    out.transactions_per_hour = completed_today as f64 / hours;
    out
}
