//! The alert threshold table.
//!
//! Every number a rule compares against lives here, so operators tune alerts
//! through configuration rather than code. Percentages use the 0..=100 scale.

use serde::{Deserialize, Serialize};

use posdash_core::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Individual low-stock alerts before the rest collapse into one summary.
    pub max_low_stock_alerts: usize,
    pub slow_mover_min: u64,

    pub behind_target_progress: f64,
    /// "Behind target" only fires after this local hour (strictly later).
    pub behind_target_after_hour: u32,
    pub target_reached_progress: f64,
    pub growth_opportunity: f64,
    pub decline_warning: f64,
    pub decline_after_hour: u32,
    /// "No sales yet" fires from this local hour on (inclusive).
    pub no_sales_from_hour: u32,

    pub no_new_customers_after_hour: u32,
    pub low_returning_rate: f64,
    pub low_returning_min_buyers: u64,
    pub new_customer_goal: u64,

    pub layby_balance_limit: f64,
    pub pending_sales_limit: u64,

    pub refund_rate_limit: f64,
    pub expense_ratio_limit: f64,
    pub low_margin: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_low_stock_alerts: 5,
            slow_mover_min: 5,
            behind_target_progress: 30.0,
            behind_target_after_hour: 16,
            target_reached_progress: 100.0,
            growth_opportunity: 20.0,
            decline_warning: -20.0,
            decline_after_hour: 16,
            no_sales_from_hour: 12,
            no_new_customers_after_hour: 16,
            low_returning_rate: 20.0,
            low_returning_min_buyers: 5,
            new_customer_goal: 50,
            layby_balance_limit: 10_000.0,
            pending_sales_limit: 10,
            refund_rate_limit: 10.0,
            expense_ratio_limit: 80.0,
            low_margin: 15.0,
        }
    }
}

impl AlertThresholds {
    /// Reject tables that could never be evaluated sensibly.
    pub fn validate(&self) -> DomainResult<()> {
        let hours = [
            ("behind_target_after_hour", self.behind_target_after_hour),
            ("decline_after_hour", self.decline_after_hour),
            ("no_sales_from_hour", self.no_sales_from_hour),
            ("no_new_customers_after_hour", self.no_new_customers_after_hour),
        ];
        for (name, hour) in hours {
            if hour > 23 {
                return Err(DomainError::validation(format!(
                    "{name} must be an hour of day (0..=23), got {hour}"
                )));
            }
        }

        let numbers = [
            ("behind_target_progress", self.behind_target_progress),
            ("target_reached_progress", self.target_reached_progress),
            ("growth_opportunity", self.growth_opportunity),
            ("decline_warning", self.decline_warning),
            ("low_returning_rate", self.low_returning_rate),
            ("layby_balance_limit", self.layby_balance_limit),
            ("refund_rate_limit", self.refund_rate_limit),
            ("expense_ratio_limit", self.expense_ratio_limit),
            ("low_margin", self.low_margin),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(DomainError::validation(format!("{name} must be finite")));
            }
        }

        // Count goals compare with `>=`; zero would fire on an empty store.
        let goals = [
            ("slow_mover_min", self.slow_mover_min),
            ("new_customer_goal", self.new_customer_goal),
        ];
        for (name, goal) in goals {
            if goal == 0 {
                return Err(DomainError::validation(format!("{name} must be at least 1")));
            }
        }

        if self.decline_warning >= 0.0 {
            return Err(DomainError::validation(
                "decline_warning must be negative (a percent drop)",
            ));
        }
        Ok(())
    }
}
