//! `posdash-alerts`
//!
//! Threshold-based business alerts over a [`MetricSnapshot`](posdash_metrics::MetricSnapshot).
//!
//! - Evaluation is pure: same snapshot + thresholds + context => same alerts
//!   (only `raised_at` moves).
//! - Rules never interact; each category evaluator appends in a fixed order.
//! - Dismissal is transient state kept in [`AlertBoard`], not in the alerts.

pub mod alert;
pub mod board;
pub mod rules;
pub mod thresholds;

pub use alert::{Alert, AlertAction, AlertId, Category, Severity};
pub use board::{AlertBoard, AlertCounts};
pub use rules::{
    customer_alerts, evaluate, financial_alerts, inventory_alerts, operations_alerts,
    sales_alerts, EvalContext, RuleInfo, RULES,
};
pub use thresholds::AlertThresholds;
