//! Month-to-date financial health: margin, expenses, refunds.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use posdash_core::SaleId;

use crate::percent;
use crate::rows::{ExpenseRow, RefundRow, SaleItemRow, SaleRow, SaleStatus};
use crate::window::ReportWindow;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseCategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialHealth {
    /// Completed sales this month.
    pub revenue: f64,
    /// Completed plus later-refunded sales this month; the refund-rate base.
    pub gross_sales: f64,
    pub cost_of_goods: f64,
    pub gross_profit: f64,
    pub gross_margin: f64,
    pub expenses: f64,
    pub net_profit: f64,
    /// Expenses as a percent of revenue.
    pub expense_ratio: f64,
    pub refunds: f64,
    /// Refunded value as a percent of gross sales.
    pub refund_rate: f64,
    pub expenses_by_category: Vec<ExpenseCategoryTotal>,
}

pub fn financial_health(
    window: &ReportWindow,
    sales: &[SaleRow],
    refunds: &[RefundRow],
    expenses: &[ExpenseRow],
    items: &[SaleItemRow],
) -> FinancialHealth {
    let month = window.month_to_date();
    let mut out = FinancialHealth::default();

    let mut completed: HashSet<SaleId> = HashSet::new();
    for sale in sales.iter().filter(|s| month.contains(s.created_at)) {
        match sale.status {
            SaleStatus::Completed => {
                out.revenue += sale.total_amount;
                out.gross_sales += sale.total_amount;
                completed.insert(sale.id);
            }
            SaleStatus::Refunded => out.gross_sales += sale.total_amount,
            _ => {}
        }
    }

    out.cost_of_goods = items
        .iter()
        .filter(|i| completed.contains(&i.sale_id))
        .map(SaleItemRow::cost)
        .sum();
    out.gross_profit = out.revenue - out.cost_of_goods;
    out.gross_margin = percent(out.gross_profit, out.revenue);

    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| month.contains(e.expense_date)) {
        out.expenses += expense.amount;
        *by_category.entry(expense.category.as_str()).or_default() += expense.amount;
    }
    out.expenses_by_category = by_category
        .into_iter()
        .map(|(category, amount)| ExpenseCategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    out.expenses_by_category
        .sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

    out.net_profit = out.gross_profit - out.expenses;
    out.expense_ratio = percent(out.expenses, out.revenue);

    out.refunds = refunds
        .iter()
        .filter(|r| month.contains(r.created_at))
        .map(|r| r.amount)
        .sum();
    out.refund_rate = percent(out.refunds, out.gross_sales);

    out
}
