//! Inventory analytics: stock value, low/out-of-stock lists, slow movers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use posdash_core::{ProductId, SaleId};

use crate::rows::{ProductRow, SaleItemRow, SaleRow};
use crate::window::ReportWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
}

impl From<&ProductRow> for StockLine {
    fn from(p: &ProductRow) -> Self {
        Self {
            product_id: p.id,
            name: p.name.clone(),
            sku: p.sku.clone(),
            stock_quantity: p.stock_quantity,
            low_stock_threshold: p.low_stock_threshold,
        }
    }
}

/// Inventory section of the snapshot. Inactive products are ignored throughout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryAnalytics {
    pub active_products: u64,
    /// Sum of positive stock quantities.
    pub total_units: i64,
    pub stock_value_cost: f64,
    pub stock_value_retail: f64,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
    pub slow_mover_count: u64,
    /// Low-stock products, fewest units first.
    pub low_stock: Vec<StockLine>,
    pub out_of_stock: Vec<StockLine>,
    pub slow_movers: Vec<StockLine>,
}

pub fn inventory_analytics(
    window: &ReportWindow,
    products: &[ProductRow],
    sales: &[SaleRow],
    items: &[SaleItemRow],
) -> InventoryAnalytics {
    let lookback = window.lookback();
    let recent_sales: HashSet<SaleId> = sales
        .iter()
        .filter(|s| s.is_completed() && lookback.contains(s.created_at))
        .map(|s| s.id)
        .collect();
    let sold_recently: HashSet<ProductId> = items
        .iter()
        .filter(|i| i.quantity > 0 && recent_sales.contains(&i.sale_id))
        .map(|i| i.product_id)
        .collect();

    let mut out = InventoryAnalytics::default();

    for product in products.iter().filter(|p| p.is_active) {
        out.active_products += 1;

        let units = product.stock_quantity.max(0);
        out.total_units += units;
        out.stock_value_cost += units as f64 * product.cost_price;
        out.stock_value_retail += units as f64 * product.selling_price;

        if product.is_out_of_stock() {
            out.out_of_stock.push(StockLine::from(product));
        } else {
            if product.is_low_stock() {
                out.low_stock.push(StockLine::from(product));
            }
            if !sold_recently.contains(&product.id) {
                out.slow_movers.push(StockLine::from(product));
            }
        }
    }

    out.low_stock.sort_by(|a, b| {
        a.stock_quantity
            .cmp(&b.stock_quantity)
            .then_with(|| a.name.cmp(&b.name))
    });
    out.out_of_stock.sort_by(|a, b| a.name.cmp(&b.name));
    out.slow_movers.sort_by(|a, b| a.name.cmp(&b.name));

    out.low_stock_count = out.low_stock.len() as u64;
    out.out_of_stock_count = out.out_of_stock.len() as u64;
    out.slow_mover_count = out.slow_movers.len() as u64;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::SaleStatus;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn window() -> ReportWindow {
        ReportWindow::at(
            Utc.with_ymd_and_hms(2026, 6, 20, 12, 0, 0).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn product(name: &str, stock: i64, threshold: i64, active: bool) -> ProductRow {
        ProductRow {
            id: ProductId::new(),
            name: name.to_string(),
            sku: name.to_uppercase(),
            category: None,
            stock_quantity: stock,
            low_stock_threshold: threshold,
            cost_price: 2.0,
            selling_price: 5.0,
            is_active: active,
        }
    }

    #[test]
    fn classifies_stock_levels() {
        let products = vec![
            product("apple", 3, 5, true),
            product("banana", 5, 5, true),
            product("cherry", 6, 5, true),
            product("date", 0, 5, true),
            product("elder", -1, 5, true),
            product("fig", 1, 5, false),
        ];

        let inv = inventory_analytics(&window(), &products, &[], &[]);

        assert_eq!(inv.active_products, 5);
        assert_eq!(inv.total_units, 14);
        assert_eq!(inv.stock_value_cost, 28.0);
        assert_eq!(inv.stock_value_retail, 70.0);
        assert_eq!(inv.low_stock_count, 2);
        assert_eq!(inv.low_stock[0].name, "apple");
        assert_eq!(inv.low_stock[1].name, "banana");
        assert_eq!(inv.out_of_stock_count, 2);
        assert_eq!(inv.slow_mover_count, 3);
    }

    #[test]
    fn recent_sale_clears_slow_mover() {
        let products = vec![product("apple", 10, 2, true), product("pear", 10, 2, true)];
        let sale = SaleRow {
            id: SaleId::new(),
            total_amount: 5.0,
            subtotal: 5.0,
            discount_amount: 0.0,
            payment_method: "cash".to_string(),
            status: SaleStatus::Completed,
            customer_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap(),
        };
        // Outside the 30 day lookback.
        let old_sale = SaleRow {
            id: SaleId::new(),
            created_at: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
            ..sale.clone()
        };
        let items = vec![
            SaleItemRow {
                sale_id: sale.id,
                product_id: products[0].id,
                product_name: "apple".to_string(),
                quantity: 1,
                unit_price: 5.0,
                cost_price: 2.0,
            },
            SaleItemRow {
                sale_id: old_sale.id,
                product_id: products[1].id,
                product_name: "pear".to_string(),
                quantity: 1,
                unit_price: 5.0,
                cost_price: 2.0,
            },
        ];

        let inv = inventory_analytics(&window(), &products, &[sale, old_sale], &items);

        assert_eq!(inv.slow_mover_count, 1);
        assert_eq!(inv.slow_movers[0].name, "pear");
    }
}
