//! Sales intelligence: revenue totals, target progress, hourly and payment breakdowns.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use posdash_core::{ProductId, SaleId};

use crate::percent;
use crate::rows::{SaleItemRow, SaleRow};
use crate::window::ReportWindow;

/// How many products the top-seller list keeps.
pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub revenue: f64,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub method: String,
    pub revenue: f64,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product_id: ProductId,
    pub name: String,
    pub units: i64,
    pub revenue: f64,
}

/// Sales section of the snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesIntelligence {
    pub today_revenue: f64,
    pub today_transactions: u64,
    pub average_transaction_value: f64,
    pub yesterday_revenue: f64,
    /// Percent change of today's revenue over yesterday's; 0 when yesterday had none.
    pub growth_vs_yesterday: f64,
    pub week_revenue: f64,
    pub month_revenue: f64,
    pub daily_target: f64,
    /// Today's revenue as a percent of `daily_target`.
    pub target_progress: f64,
    pub hourly: Vec<HourlyBucket>,
    pub payment_methods: Vec<PaymentBreakdown>,
    pub top_products: Vec<ProductPerformance>,
    pub current_hour: u32,
}

/// Reduce completed sales into the sales section.
///
/// Only `completed` sales count as revenue. `items` may cover more sales than
/// `sales`; lines whose sale is not a completed sale of this month are ignored.
pub fn sales_intelligence(
    window: &ReportWindow,
    sales: &[SaleRow],
    items: &[SaleItemRow],
    daily_target: f64,
) -> SalesIntelligence {
    let today = window.today();
    let yesterday = window.yesterday();
    let week = window.week_to_date();
    let month = window.month_to_date();

    let mut out = SalesIntelligence {
        daily_target,
        current_hour: window.local_hour(),
        hourly: (0..24)
            .map(|hour| HourlyBucket {
                hour,
                ..HourlyBucket::default()
            })
            .collect(),
        ..SalesIntelligence::default()
    };

    let mut payments: HashMap<&str, PaymentBreakdown> = HashMap::new();
    let mut month_sales: HashSet<SaleId> = HashSet::new();

    for sale in sales.iter().filter(|s| s.is_completed()) {
        let at = sale.created_at;
        if today.contains(at) {
            out.today_revenue += sale.total_amount;
            out.today_transactions += 1;

            let bucket = &mut out.hourly[window.hour_of(at) as usize];
            bucket.revenue += sale.total_amount;
            bucket.transactions += 1;

            let entry = payments
                .entry(sale.payment_method.as_str())
                .or_insert_with(|| PaymentBreakdown {
                    method: sale.payment_method.clone(),
                    ..PaymentBreakdown::default()
                });
            entry.revenue += sale.total_amount;
            entry.transactions += 1;
        }
        if yesterday.contains(at) {
            out.yesterday_revenue += sale.total_amount;
        }
        if week.contains(at) {
            out.week_revenue += sale.total_amount;
        }
        if month.contains(at) {
            out.month_revenue += sale.total_amount;
            month_sales.insert(sale.id);
        }
    }

    if out.today_transactions > 0 {
        out.average_transaction_value = out.today_revenue / out.today_transactions as f64;
    }
    if out.yesterday_revenue > 0.0 {
        out.growth_vs_yesterday =
            percent(out.today_revenue - out.yesterday_revenue, out.yesterday_revenue);
    }
    out.target_progress = percent(out.today_revenue, daily_target);

    let mut payment_methods: Vec<PaymentBreakdown> = payments.into_values().collect();
    payment_methods.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.method.cmp(&b.method))
    });
    out.payment_methods = payment_methods;

    out.top_products = top_products(items, &month_sales, TOP_PRODUCTS);
    out
}

fn top_products(
    items: &[SaleItemRow],
    sales: &HashSet<SaleId>,
    limit: usize,
) -> Vec<ProductPerformance> {
    let mut by_product: HashMap<ProductId, ProductPerformance> = HashMap::new();
    for item in items.iter().filter(|i| sales.contains(&i.sale_id)) {
        let entry = by_product
            .entry(item.product_id)
            .or_insert_with(|| ProductPerformance {
                product_id: item.product_id,
                name: item.product_name.clone(),
                units: 0,
                revenue: 0.0,
            });
        entry.units += item.quantity;
        entry.revenue += item.revenue();
    }

    let mut ranked: Vec<ProductPerformance> = by_product.into_values().collect();
    ranked.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::SaleStatus;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn window() -> ReportWindow {
        // Wednesday 2026-04-15 17:00 UTC.
        ReportWindow::at(
            Utc.with_ymd_and_hms(2026, 4, 15, 17, 0, 0).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn sale(at: DateTime<Utc>, amount: f64, method: &str, status: SaleStatus) -> SaleRow {
        SaleRow {
            id: SaleId::new(),
            total_amount: amount,
            subtotal: amount,
            discount_amount: 0.0,
            payment_method: method.to_string(),
            status,
            customer_id: None,
            created_at: at,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn totals_and_growth() {
        let sales = vec![
            sale(at(15, 9), 100.0, "cash", SaleStatus::Completed),
            sale(at(15, 10), 50.0, "card", SaleStatus::Completed),
            sale(at(15, 11), 999.0, "card", SaleStatus::Voided),
            sale(at(14, 12), 100.0, "cash", SaleStatus::Completed),
            sale(at(1, 12), 25.0, "cash", SaleStatus::Completed),
        ];

        let s = sales_intelligence(&window(), &sales, &[], 300.0);

        assert_eq!(s.today_revenue, 150.0);
        assert_eq!(s.today_transactions, 2);
        assert_eq!(s.average_transaction_value, 75.0);
        assert_eq!(s.yesterday_revenue, 100.0);
        assert_eq!(s.growth_vs_yesterday, 50.0);
        assert_eq!(s.week_revenue, 250.0);
        assert_eq!(s.month_revenue, 275.0);
        assert_eq!(s.target_progress, 50.0);
        assert_eq!(s.current_hour, 17);
        assert_eq!(s.hourly.len(), 24);
        assert_eq!(s.hourly[9].revenue, 100.0);
        assert_eq!(s.hourly[11].transactions, 0);
        assert_eq!(s.payment_methods[0].method, "cash");
        assert_eq!(s.payment_methods[1].method, "card");
    }

    #[test]
    fn growth_is_zero_without_yesterday_sales() {
        let sales = vec![sale(at(15, 9), 100.0, "cash", SaleStatus::Completed)];
        let s = sales_intelligence(&window(), &sales, &[], 0.0);
        assert_eq!(s.growth_vs_yesterday, 0.0);
        assert_eq!(s.target_progress, 0.0);
    }

    #[test]
    fn top_products_rank_by_month_revenue() {
        let a = sale(at(10, 9), 30.0, "cash", SaleStatus::Completed);
        let b = sale(at(15, 9), 20.0, "cash", SaleStatus::Completed);
        let refunded = sale(at(15, 10), 500.0, "cash", SaleStatus::Refunded);
        let widget = ProductId::new();
        let gadget = ProductId::new();

        let line = |sale: &SaleRow, product: ProductId, name: &str, qty: i64, price: f64| SaleItemRow {
            sale_id: sale.id,
            product_id: product,
            product_name: name.to_string(),
            quantity: qty,
            unit_price: price,
            cost_price: price / 2.0,
        };

        let items = vec![
            line(&a, widget, "Widget", 3, 10.0),
            line(&b, gadget, "Gadget", 1, 20.0),
            line(&b, widget, "Widget", 0, 10.0),
            line(&refunded, gadget, "Gadget", 50, 10.0),
        ];

        let s = sales_intelligence(&window(), &[a, b, refunded], &items, 100.0);

        assert_eq!(s.top_products.len(), 2);
        assert_eq!(s.top_products[0].name, "Widget");
        assert_eq!(s.top_products[0].units, 3);
        assert_eq!(s.top_products[0].revenue, 30.0);
        assert_eq!(s.top_products[1].name, "Gadget");
        assert_eq!(s.top_products[1].revenue, 20.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Hourly buckets always add up to today's totals.
            #[test]
            fn hourly_buckets_sum_to_today(
                entries in prop::collection::vec((0u32..24, 1u32..10_000), 0..40)
            ) {
                let sales: Vec<SaleRow> = entries
                    .iter()
                    .map(|(hour, cents)| sale(at(15, *hour), *cents as f64 / 100.0, "cash", SaleStatus::Completed))
                    .collect();

                let s = sales_intelligence(&window(), &sales, &[], 1000.0);

                let tx: u64 = s.hourly.iter().map(|b| b.transactions).sum();
                let revenue: f64 = s.hourly.iter().map(|b| b.revenue).sum();
                prop_assert_eq!(tx, s.today_transactions);
                prop_assert!((revenue - s.today_revenue).abs() < 1e-6);
            }
        }
    }
}
