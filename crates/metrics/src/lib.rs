//! Store metrics (pure aggregation).
//!
//! Row types mirror the remote tables; every function here is a deterministic
//! reduction over already-fetched rows (no IO, no clock reads).

pub mod customers;
pub mod financial;
pub mod inventory;
pub mod operations;
pub mod rows;
pub mod sales;
pub mod snapshot;
pub mod window;

pub use customers::{customer_insights, CustomerInsights, CustomerSummary};
pub use financial::{financial_health, ExpenseCategoryTotal, FinancialHealth};
pub use inventory::{inventory_analytics, InventoryAnalytics, StockLine};
pub use operations::{operations_metrics, OperationsMetrics};
pub use rows::{
    CustomerRow, ExpenseRow, LaybyRow, LaybyStatus, ProductRow, RefundRow, SaleItemRow, SaleRow,
    SaleStatus,
};
pub use sales::{
    sales_intelligence, HourlyBucket, PaymentBreakdown, ProductPerformance, SalesIntelligence,
};
pub use snapshot::{MetricSnapshot, Section, StoreRows};
pub use window::{ReportWindow, TimeRange};

/// `part` as a percentage of `whole` (0..=100 scale). Zero when `whole <= 0`.
///
/// Multiplies before dividing so whole-number inputs land on exact values
/// (1500 of 5000 is exactly 30.0).
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !whole.is_finite() {
        return 0.0;
    }
    part * 100.0 / whole
}
