//! Customer insights: acquisition, returning buyers, lifetime value.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use posdash_core::CustomerId;

use crate::percent;
use crate::rows::{CustomerRow, SaleRow};
use crate::window::ReportWindow;

pub const TOP_CUSTOMERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerInsights {
    pub total_customers: u64,
    pub new_today: u64,
    pub new_this_month: u64,
    /// Distinct identified customers with a completed sale today.
    pub buyers_today: u64,
    /// Percent of today's buyers whose account predates today.
    pub returning_rate: f64,
    pub average_lifetime_value: f64,
    pub top_customers: Vec<CustomerSummary>,
}

pub fn customer_insights(
    window: &ReportWindow,
    customers: &[CustomerRow],
    sales: &[SaleRow],
) -> CustomerInsights {
    let today = window.today();
    let month = window.month_to_date();

    let mut out = CustomerInsights {
        total_customers: customers.len() as u64,
        ..CustomerInsights::default()
    };

    let mut lifetime = 0.0;
    let created: HashMap<CustomerId, _> = customers.iter().map(|c| (c.id, c.created_at)).collect();
    for customer in customers {
        lifetime += customer.total_spent;
        if today.contains(customer.created_at) {
            out.new_today += 1;
        }
        if month.contains(customer.created_at) {
            out.new_this_month += 1;
        }
    }
    if !customers.is_empty() {
        out.average_lifetime_value = lifetime / customers.len() as f64;
    }

    let buyers: HashSet<CustomerId> = sales
        .iter()
        .filter(|s| s.is_completed() && today.contains(s.created_at))
        .filter_map(|s| s.customer_id)
        .collect();
    let returning = buyers
        .iter()
        .filter(|id| created.get(*id).is_some_and(|at| *at < window.today_start))
        .count();
    out.buyers_today = buyers.len() as u64;
    out.returning_rate = percent(returning as f64, buyers.len() as f64);

    let mut ranked: Vec<CustomerSummary> = customers
        .iter()
        .map(|c| CustomerSummary {
            id: c.id,
            name: c.name.clone(),
            total_spent: c.total_spent,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total_spent
            .total_cmp(&a.total_spent)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(TOP_CUSTOMERS);
    out.top_customers = ranked;

    out
}
