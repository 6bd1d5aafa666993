//! Category evaluators.
//!
//! Each evaluator reads its own section of the snapshot and appends zero or
//! more alerts. Comparison operators are part of the contract: a metric sitting
//! exactly on a threshold fires only where the operator is inclusive.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use posdash_metrics::{MetricSnapshot, ReportWindow};

use crate::alert::{Alert, AlertId, Category, Severity};
use crate::thresholds::AlertThresholds;

const OUT_OF_STOCK: &str = "inventory.out_of_stock";
const LOW_STOCK: &str = "inventory.low_stock";
const LOW_STOCK_SUMMARY: &str = "inventory.low_stock_summary";
const SLOW_MOVERS: &str = "inventory.slow_movers";
const BEHIND_TARGET: &str = "sales.behind_target";
const TARGET_REACHED: &str = "sales.target_reached";
const SALES_GROWTH: &str = "sales.growth";
const SALES_DECLINE: &str = "sales.decline";
const NO_SALES: &str = "sales.no_sales";
const NO_NEW_CUSTOMERS: &str = "customer.no_new_customers";
const LOW_RETURNING: &str = "customer.low_returning";
const NEW_CUSTOMER_GROWTH: &str = "customer.new_growth";
const OVERDUE_LAYBYS: &str = "operations.overdue_laybys";
const LAYBY_BALANCE: &str = "operations.layby_balance";
const PENDING_SALES: &str = "operations.pending_sales";
const HIGH_REFUND_RATE: &str = "financial.high_refund_rate";
const EXPENSE_RATIO: &str = "financial.expense_ratio";
const LOW_MARGIN: &str = "financial.low_margin";
const NEGATIVE_PROFIT: &str = "financial.negative_profit";

/// Catalog entry describing one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub condition: &'static str,
}

/// Every rule, in evaluation order.
pub const RULES: &[RuleInfo] = &[
    RuleInfo { id: OUT_OF_STOCK, category: Category::Inventory, severity: Severity::Critical, condition: "out_of_stock_count > 0" },
    RuleInfo { id: LOW_STOCK, category: Category::Inventory, severity: Severity::Warning, condition: "0 < stock_quantity <= low_stock_threshold (per product, up to max_low_stock_alerts)" },
    RuleInfo { id: LOW_STOCK_SUMMARY, category: Category::Inventory, severity: Severity::Warning, condition: "low_stock_count > max_low_stock_alerts" },
    RuleInfo { id: SLOW_MOVERS, category: Category::Inventory, severity: Severity::Info, condition: "slow_mover_count >= slow_mover_min" },
    RuleInfo { id: BEHIND_TARGET, category: Category::Sales, severity: Severity::Warning, condition: "target_progress < behind_target_progress && hour > behind_target_after_hour" },
    RuleInfo { id: TARGET_REACHED, category: Category::Sales, severity: Severity::Success, condition: "target_progress >= target_reached_progress" },
    RuleInfo { id: SALES_GROWTH, category: Category::Sales, severity: Severity::Opportunity, condition: "growth_vs_yesterday > growth_opportunity" },
    RuleInfo { id: SALES_DECLINE, category: Category::Sales, severity: Severity::Warning, condition: "growth_vs_yesterday < decline_warning && hour > decline_after_hour" },
    RuleInfo { id: NO_SALES, category: Category::Sales, severity: Severity::Warning, condition: "today_transactions == 0 && hour >= no_sales_from_hour" },
    RuleInfo { id: NO_NEW_CUSTOMERS, category: Category::Customer, severity: Severity::Info, condition: "new_today == 0 && hour > no_new_customers_after_hour" },
    RuleInfo { id: LOW_RETURNING, category: Category::Customer, severity: Severity::Info, condition: "returning_rate < low_returning_rate && buyers_today >= low_returning_min_buyers" },
    RuleInfo { id: NEW_CUSTOMER_GROWTH, category: Category::Customer, severity: Severity::Success, condition: "new_this_month >= new_customer_goal" },
    RuleInfo { id: OVERDUE_LAYBYS, category: Category::Operations, severity: Severity::Warning, condition: "overdue_laybys > 0" },
    RuleInfo { id: LAYBY_BALANCE, category: Category::Operations, severity: Severity::Info, condition: "outstanding_balance > layby_balance_limit" },
    RuleInfo { id: PENDING_SALES, category: Category::Operations, severity: Severity::Warning, condition: "pending_sales > pending_sales_limit" },
    RuleInfo { id: HIGH_REFUND_RATE, category: Category::Financial, severity: Severity::Critical, condition: "refund_rate > refund_rate_limit" },
    RuleInfo { id: EXPENSE_RATIO, category: Category::Financial, severity: Severity::Warning, condition: "expense_ratio > expense_ratio_limit" },
    RuleInfo { id: LOW_MARGIN, category: Category::Financial, severity: Severity::Warning, condition: "revenue > 0 && gross_margin < low_margin" },
    RuleInfo { id: NEGATIVE_PROFIT, category: Category::Financial, severity: Severity::Critical, condition: "revenue > 0 && net_profit < 0" },
];

/// Evaluation instant plus the store-local hour the time-of-day rules use.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvalContext {
    pub now: DateTime<Utc>,
    pub local_hour: u32,
}

impl EvalContext {
    pub fn new(now: DateTime<Utc>, local_hour: u32) -> Self {
        Self { now, local_hour }
    }
}

impl From<&ReportWindow> for EvalContext {
    fn from(window: &ReportWindow) -> Self {
        Self::new(window.now, window.local_hour())
    }
}

/// Run every category evaluator (inventory, sales, customer, operations, financial).
pub fn evaluate(
    snapshot: &MetricSnapshot,
    thresholds: &AlertThresholds,
    ctx: &EvalContext,
) -> Vec<Alert> {
    let mut alerts = inventory_alerts(snapshot, thresholds, ctx);
    alerts.extend(sales_alerts(snapshot, thresholds, ctx));
    alerts.extend(customer_alerts(snapshot, thresholds, ctx));
    alerts.extend(operations_alerts(snapshot, thresholds, ctx));
    alerts.extend(financial_alerts(snapshot, thresholds, ctx));

    debug!(count = alerts.len(), hour = ctx.local_hour, "alerts evaluated");
    alerts
}

pub fn inventory_alerts(
    snapshot: &MetricSnapshot,
    t: &AlertThresholds,
    ctx: &EvalContext,
) -> Vec<Alert> {
    let inv = &snapshot.inventory;
    let mut out = Vec::new();

    if inv.out_of_stock_count > 0 {
        out.push(
            Alert::new(
                AlertId::rule(OUT_OF_STOCK),
                Severity::Critical,
                Category::Inventory,
                "Products out of stock",
                format!("{} product(s) have no stock on hand", inv.out_of_stock_count),
                ctx.now,
            )
            .with_action("Reorder", "/inventory/out-of-stock"),
        );
    }

    let low: Vec<_> = inv
        .low_stock
        .iter()
        .filter(|l| l.stock_quantity > 0 && l.stock_quantity <= l.low_stock_threshold)
        .collect();
    for line in low.iter().take(t.max_low_stock_alerts) {
        out.push(
            Alert::new(
                AlertId::subject(LOW_STOCK, line.product_id),
                Severity::Warning,
                Category::Inventory,
                format!("Low stock: {}", line.name),
                format!(
                    "{} ({}) has {} left; restock level is {}",
                    line.name, line.sku, line.stock_quantity, line.low_stock_threshold
                ),
                ctx.now,
            )
            .with_action("Restock", format!("/inventory/products/{}", line.product_id)),
        );
    }

    let remaining = low.len().saturating_sub(t.max_low_stock_alerts);
    if remaining > 0 {
        out.push(
            Alert::new(
                AlertId::rule(LOW_STOCK_SUMMARY),
                Severity::Warning,
                Category::Inventory,
                "More products running low",
                format!("{remaining} more product(s) are at or below their restock level"),
                ctx.now,
            )
            .with_action("View low stock", "/inventory/low-stock"),
        );
    }

    if inv.slow_mover_count >= t.slow_mover_min {
        out.push(Alert::new(
            AlertId::rule(SLOW_MOVERS),
            Severity::Info,
            Category::Inventory,
            "Slow-moving stock",
            format!(
                "{} product(s) in stock have not sold in 30 days",
                inv.slow_mover_count
            ),
            ctx.now,
        ));
    }

    out
}

pub fn sales_alerts(snapshot: &MetricSnapshot, t: &AlertThresholds, ctx: &EvalContext) -> Vec<Alert> {
    let s = &snapshot.sales;
    let hour = ctx.local_hour;
    let has_target = s.daily_target > 0.0;
    let has_yesterday = s.yesterday_revenue > 0.0;
    let mut out = Vec::new();

    if has_target && s.target_progress < t.behind_target_progress && hour > t.behind_target_after_hour {
        out.push(
            Alert::new(
                AlertId::rule(BEHIND_TARGET),
                Severity::Warning,
                Category::Sales,
                "Sales behind target",
                format!(
                    "Only {:.1}% of today's {:.2} target reached",
                    s.target_progress, s.daily_target
                ),
                ctx.now,
            )
            .with_action("View sales", "/sales"),
        );
    }

    if has_target && s.target_progress >= t.target_reached_progress {
        out.push(Alert::new(
            AlertId::rule(TARGET_REACHED),
            Severity::Success,
            Category::Sales,
            "Daily target reached",
            format!(
                "{:.2} sold today ({:.1}% of target)",
                s.today_revenue, s.target_progress
            ),
            ctx.now,
        ));
    }

    if has_yesterday && s.growth_vs_yesterday > t.growth_opportunity {
        out.push(Alert::new(
            AlertId::rule(SALES_GROWTH),
            Severity::Opportunity,
            Category::Sales,
            "Sales up on yesterday",
            format!("Revenue is {:.1}% ahead of yesterday", s.growth_vs_yesterday),
            ctx.now,
        ));
    }

    if has_yesterday && s.growth_vs_yesterday < t.decline_warning && hour > t.decline_after_hour {
        out.push(Alert::new(
            AlertId::rule(SALES_DECLINE),
            Severity::Warning,
            Category::Sales,
            "Sales down on yesterday",
            format!("Revenue is {:.1}% behind yesterday", -s.growth_vs_yesterday),
            ctx.now,
        ));
    }

    if s.today_transactions == 0 && hour >= t.no_sales_from_hour {
        out.push(
            Alert::new(
                AlertId::rule(NO_SALES),
                Severity::Warning,
                Category::Sales,
                "No sales yet today",
                format!("No completed transactions recorded by {hour:02}:00"),
                ctx.now,
            )
            .with_action("Check tills", "/sales"),
        );
    }

    out
}

pub fn customer_alerts(
    snapshot: &MetricSnapshot,
    t: &AlertThresholds,
    ctx: &EvalContext,
) -> Vec<Alert> {
    let c = &snapshot.customers;
    let mut out = Vec::new();

    if c.new_today == 0 && ctx.local_hour > t.no_new_customers_after_hour {
        out.push(Alert::new(
            AlertId::rule(NO_NEW_CUSTOMERS),
            Severity::Info,
            Category::Customer,
            "No new customers today",
            "No customer accounts have been created today",
            ctx.now,
        ));
    }

    if c.buyers_today >= t.low_returning_min_buyers && c.returning_rate < t.low_returning_rate {
        out.push(Alert::new(
            AlertId::rule(LOW_RETURNING),
            Severity::Info,
            Category::Customer,
            "Few returning customers",
            format!(
                "{:.1}% of today's {} buyers are returning customers",
                c.returning_rate, c.buyers_today
            ),
            ctx.now,
        ));
    }

    if c.new_this_month >= t.new_customer_goal {
        out.push(Alert::new(
            AlertId::rule(NEW_CUSTOMER_GROWTH),
            Severity::Success,
            Category::Customer,
            "Customer goal reached",
            format!("{} new customers this month", c.new_this_month),
            ctx.now,
        ));
    }

    out
}

pub fn operations_alerts(
    snapshot: &MetricSnapshot,
    t: &AlertThresholds,
    ctx: &EvalContext,
) -> Vec<Alert> {
    let o = &snapshot.operations;
    let mut out = Vec::new();

    if o.overdue_laybys > 0 {
        out.push(
            Alert::new(
                AlertId::rule(OVERDUE_LAYBYS),
                Severity::Warning,
                Category::Operations,
                "Overdue laybys",
                format!("{} layby(s) are past their due date", o.overdue_laybys),
                ctx.now,
            )
            .with_action("Follow up", "/laybys?status=overdue"),
        );
    }

    if o.outstanding_balance > t.layby_balance_limit {
        out.push(Alert::new(
            AlertId::rule(LAYBY_BALANCE),
            Severity::Info,
            Category::Operations,
            "High layby balance",
            format!(
                "{:.2} outstanding across {} open layby(s)",
                o.outstanding_balance, o.active_laybys
            ),
            ctx.now,
        ));
    }

    if o.pending_sales > t.pending_sales_limit {
        out.push(Alert::new(
            AlertId::rule(PENDING_SALES),
            Severity::Warning,
            Category::Operations,
            "Pending sales piling up",
            format!("{} sales are still pending this month", o.pending_sales),
            ctx.now,
        ));
    }

    out
}

pub fn financial_alerts(
    snapshot: &MetricSnapshot,
    t: &AlertThresholds,
    ctx: &EvalContext,
) -> Vec<Alert> {
    let f = &snapshot.financial;
    let mut out = Vec::new();

    if f.refund_rate > t.refund_rate_limit {
        out.push(
            Alert::new(
                AlertId::rule(HIGH_REFUND_RATE),
                Severity::Critical,
                Category::Financial,
                "High refund rate",
                format!(
                    "{:.1}% of this month's sales were refunded ({:.2})",
                    f.refund_rate, f.refunds
                ),
                ctx.now,
            )
            .with_action("Review refunds", "/refunds"),
        );
    }

    if f.expense_ratio > t.expense_ratio_limit {
        out.push(Alert::new(
            AlertId::rule(EXPENSE_RATIO),
            Severity::Warning,
            Category::Financial,
            "Expenses high relative to revenue",
            format!("Expenses are {:.1}% of revenue this month", f.expense_ratio),
            ctx.now,
        ));
    }

    if f.revenue > 0.0 && f.gross_margin < t.low_margin {
        out.push(Alert::new(
            AlertId::rule(LOW_MARGIN),
            Severity::Warning,
            Category::Financial,
            "Low gross margin",
            format!("Gross margin is {:.1}% this month", f.gross_margin),
            ctx.now,
        ));
    }

    if f.revenue > 0.0 && f.net_profit < 0.0 {
        out.push(Alert::new(
            AlertId::rule(NEGATIVE_PROFIT),
            Severity::Critical,
            Category::Financial,
            "Running at a loss",
            format!("Net profit this month is {:.2}", f.net_profit),
            ctx.now,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use posdash_core::ProductId;
    use posdash_metrics::StockLine;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 5, 12, 0, 0).unwrap()
    }

    /// A snapshot that trips no rule at any hour.
    fn quiet() -> MetricSnapshot {
        let mut s = MetricSnapshot::empty(now());
        s.sales.daily_target = 1000.0;
        s.sales.today_revenue = 500.0;
        s.sales.today_transactions = 10;
        s.sales.target_progress = 50.0;
        s.sales.yesterday_revenue = 500.0;
        s.customers.new_today = 1;
        s.financial.revenue = 1000.0;
        s.financial.gross_margin = 40.0;
        s.financial.net_profit = 100.0;
        s
    }

    fn ctx(hour: u32) -> EvalContext {
        EvalContext::new(now(), hour)
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    fn low_line(name: &str, qty: i64, threshold: i64) -> StockLine {
        StockLine {
            product_id: ProductId::new(),
            name: name.to_string(),
            sku: name.to_uppercase(),
            stock_quantity: qty,
            low_stock_threshold: threshold,
        }
    }

    #[test]
    fn quiet_snapshot_raises_nothing() {
        let t = AlertThresholds::default();
        for hour in 0..24 {
            assert!(evaluate(&quiet(), &t, &ctx(hour)).is_empty(), "hour {hour}");
        }
    }

    #[test]
    fn refund_rate_boundary_is_exclusive() {
        let t = AlertThresholds::default();
        let mut s = quiet();

        s.financial.refund_rate = 10.0;
        assert!(financial_alerts(&s, &t, &ctx(12)).is_empty());

        s.financial.refund_rate = 10.01;
        let alerts = financial_alerts(&s, &t, &ctx(12));
        assert_eq!(ids(&alerts), vec!["financial.high_refund_rate"]);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn behind_target_needs_low_progress_and_late_hour() {
        let t = AlertThresholds::default();
        let mut s = quiet();
        s.sales.target_progress = 29.9;

        assert!(sales_alerts(&s, &t, &ctx(16)).is_empty());
        assert_eq!(ids(&sales_alerts(&s, &t, &ctx(17))), vec!["sales.behind_target"]);

        s.sales.target_progress = 30.0;
        assert!(sales_alerts(&s, &t, &ctx(17)).is_empty());

        // No target configured: nothing to be behind on.
        s.sales.target_progress = 0.0;
        s.sales.daily_target = 0.0;
        assert!(sales_alerts(&s, &t, &ctx(20)).is_empty());
    }

    #[test]
    fn target_reached_is_inclusive() {
        let t = AlertThresholds::default();
        let mut s = quiet();
        s.sales.target_progress = 100.0;
        assert_eq!(ids(&sales_alerts(&s, &t, &ctx(9))), vec!["sales.target_reached"]);
    }

    #[test]
    fn growth_and_decline() {
        let t = AlertThresholds::default();
        let mut s = quiet();

        s.sales.growth_vs_yesterday = 20.0;
        assert!(sales_alerts(&s, &t, &ctx(10)).is_empty());
        s.sales.growth_vs_yesterday = 25.0;
        assert_eq!(ids(&sales_alerts(&s, &t, &ctx(10))), vec!["sales.growth"]);

        s.sales.growth_vs_yesterday = -25.0;
        assert!(sales_alerts(&s, &t, &ctx(10)).is_empty());
        assert_eq!(ids(&sales_alerts(&s, &t, &ctx(18))), vec!["sales.decline"]);

        s.sales.yesterday_revenue = 0.0;
        assert!(sales_alerts(&s, &t, &ctx(18)).is_empty());
    }

    #[test]
    fn no_sales_from_noon_inclusive() {
        let t = AlertThresholds::default();
        let mut s = quiet();
        s.sales.today_transactions = 0;
        assert!(sales_alerts(&s, &t, &ctx(11)).is_empty());
        assert_eq!(ids(&sales_alerts(&s, &t, &ctx(12))), vec!["sales.no_sales"]);
    }

    #[test]
    fn low_stock_caps_individual_alerts() {
        let t = AlertThresholds {
            max_low_stock_alerts: 2,
            ..AlertThresholds::default()
        };
        let mut s = quiet();
        s.inventory.low_stock = vec![
            low_line("a", 1, 5),
            low_line("b", 2, 5),
            low_line("c", 5, 5),
            // Not low: ignored even if the list was built elsewhere.
            low_line("d", 6, 5),
        ];
        s.inventory.low_stock_count = 4;

        let alerts = inventory_alerts(&s, &t, &ctx(9));

        assert_eq!(alerts.len(), 3);
        assert!(alerts[0].id.as_str().starts_with("inventory.low_stock:"));
        assert!(alerts[1].id.as_str().starts_with("inventory.low_stock:"));
        assert_eq!(alerts[2].id.as_str(), "inventory.low_stock_summary");
        assert!(alerts[2].message.starts_with("1 more"));
    }

    #[test]
    fn count_goals_fire_exactly_at_the_minimum() {
        let t = AlertThresholds {
            slow_mover_min: 1,
            new_customer_goal: 1,
            ..AlertThresholds::default()
        };
        let mut s = quiet();
        assert!(evaluate(&s, &t, &ctx(9)).is_empty());

        s.inventory.slow_mover_count = 1;
        s.customers.new_this_month = 1;
        let alerts = evaluate(&s, &t, &ctx(9));
        assert_eq!(ids(&alerts), vec!["inventory.slow_movers", "customer.new_growth"]);
    }

    #[test]
    fn out_of_stock_is_critical_and_first() {
        let t = AlertThresholds::default();
        let mut s = quiet();
        s.inventory.out_of_stock_count = 2;
        s.inventory.low_stock = vec![low_line("a", 1, 3)];
        s.inventory.slow_mover_count = 5;

        let alerts = inventory_alerts(&s, &t, &ctx(9));
        assert_eq!(alerts[0].id.as_str(), "inventory.out_of_stock");
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[2].id.as_str(), "inventory.slow_movers");
    }

    #[test]
    fn operations_and_customer_rules() {
        let t = AlertThresholds::default();
        let mut s = quiet();
        s.operations.overdue_laybys = 1;
        s.operations.outstanding_balance = 10_000.0;
        s.operations.pending_sales = 11;
        assert_eq!(
            ids(&operations_alerts(&s, &t, &ctx(9))),
            vec!["operations.overdue_laybys", "operations.pending_sales"]
        );

        s.customers.new_today = 0;
        s.customers.buyers_today = 5;
        s.customers.returning_rate = 19.0;
        s.customers.new_this_month = 50;
        assert_eq!(
            ids(&customer_alerts(&s, &t, &ctx(17))),
            vec!["customer.no_new_customers", "customer.low_returning", "customer.new_growth"]
        );
    }

    #[test]
    fn evaluation_order_follows_categories() {
        let t = AlertThresholds::default();
        let mut s = quiet();
        s.financial.refund_rate = 50.0;
        s.operations.overdue_laybys = 3;
        s.inventory.out_of_stock_count = 1;
        s.sales.today_transactions = 0;

        let alerts = evaluate(&s, &t, &ctx(13));
        let categories: Vec<Category> = alerts.iter().map(|a| a.category).collect();
        assert_eq!(
            categories,
            vec![Category::Inventory, Category::Sales, Category::Operations, Category::Financial]
        );
    }

    #[test]
    fn catalog_lists_every_rule_once() {
        let mut ids: Vec<&str> = RULES.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), RULES.len());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn snapshot_strategy() -> impl Strategy<Value = MetricSnapshot> {
            (
                (0u64..4, 0u64..8, 0.0f64..150.0, -60.0f64..60.0, 0u64..3),
                (0u64..3, 0u64..10, 0.0f64..40.0, 0u64..80),
                (0u64..3, 0.0f64..20_000.0, 0u64..20),
                (0.0f64..20.0, 0.0f64..120.0, -10.0f64..60.0, -500.0f64..500.0),
            )
                .prop_map(|(sales, cust, ops, fin)| {
                    let mut s = MetricSnapshot::empty(now());
                    s.inventory.out_of_stock_count = sales.0;
                    s.inventory.slow_mover_count = sales.1;
                    s.sales.daily_target = 1000.0;
                    s.sales.target_progress = sales.2;
                    s.sales.today_revenue = sales.2 * 10.0;
                    s.sales.yesterday_revenue = 100.0;
                    s.sales.growth_vs_yesterday = sales.3;
                    s.sales.today_transactions = sales.4;
                    s.customers.new_today = cust.0;
                    s.customers.buyers_today = cust.1;
                    s.customers.returning_rate = cust.2;
                    s.customers.new_this_month = cust.3;
                    s.operations.overdue_laybys = ops.0;
                    s.operations.outstanding_balance = ops.1;
                    s.operations.pending_sales = ops.2;
                    s.financial.refund_rate = fin.0;
                    s.financial.expense_ratio = fin.1;
                    s.financial.revenue = 1000.0;
                    s.financial.gross_margin = fin.2;
                    s.financial.net_profit = fin.3;
                    s
                })
        }

        /// Independent restatement of every single-shot rule condition.
        fn expected_count(s: &MetricSnapshot, t: &AlertThresholds, hour: u32) -> usize {
            let conditions = [
                s.inventory.out_of_stock_count > 0,
                s.inventory.slow_mover_count >= t.slow_mover_min,
                s.sales.target_progress < t.behind_target_progress && hour > t.behind_target_after_hour,
                s.sales.target_progress >= t.target_reached_progress,
                s.sales.growth_vs_yesterday > t.growth_opportunity,
                s.sales.growth_vs_yesterday < t.decline_warning && hour > t.decline_after_hour,
                s.sales.today_transactions == 0 && hour >= t.no_sales_from_hour,
                s.customers.new_today == 0 && hour > t.no_new_customers_after_hour,
                s.customers.buyers_today >= t.low_returning_min_buyers
                    && s.customers.returning_rate < t.low_returning_rate,
                s.customers.new_this_month >= t.new_customer_goal,
                s.operations.overdue_laybys > 0,
                s.operations.outstanding_balance > t.layby_balance_limit,
                s.operations.pending_sales > t.pending_sales_limit,
                s.financial.refund_rate > t.refund_rate_limit,
                s.financial.expense_ratio > t.expense_ratio_limit,
                s.financial.gross_margin < t.low_margin,
                s.financial.net_profit < 0.0,
            ];
            conditions.iter().filter(|c| **c).count()
        }

        proptest! {
            #[test]
            fn one_alert_per_true_condition(s in snapshot_strategy(), hour in 0u32..24) {
                let t = AlertThresholds::default();
                let alerts = evaluate(&s, &t, &ctx(hour));
                prop_assert_eq!(alerts.len(), expected_count(&s, &t, hour));
            }

            #[test]
            fn re_evaluation_is_equivalent(s in snapshot_strategy(), hour in 0u32..24) {
                let t = AlertThresholds::default();
                let first = evaluate(&s, &t, &ctx(hour));
                let later = EvalContext::new(now() + chrono::Duration::minutes(3), hour);
                let second = evaluate(&s, &t, &later);

                prop_assert_eq!(first.len(), second.len());
                for (a, b) in first.iter().zip(second.iter()) {
                    prop_assert!(a.equivalent(b));
                }
            }
        }
    }
}
