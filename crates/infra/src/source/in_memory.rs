//! In-memory row source for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use posdash_core::{CustomerId, ExpenseId, LaybyId, ProductId, RefundId, SaleId};
use posdash_metrics::{
    CustomerRow, ExpenseRow, LaybyRow, LaybyStatus, ProductRow, RefundRow, SaleItemRow, SaleRow,
    SaleStatus, StoreRows, TimeRange,
};

use super::{DashboardSource, SourceError, Table};

/// Seedable source backed by a [`StoreRows`] value.
///
/// Individual tables can be switched to failing to exercise partial-refresh
/// behaviour.
#[derive(Debug, Default)]
pub struct InMemoryDashboardSource {
    rows: RwLock<StoreRows>,
    failing: RwLock<HashSet<Table>>,
}

impl InMemoryDashboardSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: StoreRows) -> Self {
        Self {
            rows: RwLock::new(rows),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Small, deterministic store for running the service without a database.
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self::with_rows(demo_rows(now))
    }

    pub fn update(&self, f: impl FnOnce(&mut StoreRows)) {
        if let Ok(mut guard) = self.rows.write() {
            f(&mut guard);
        }
    }

    /// Make every read of `table` fail until [`heal`](Self::heal) is called.
    pub fn fail(&self, table: Table) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(table);
        }
    }

    pub fn heal(&self, table: Table) {
        if let Ok(mut failing) = self.failing.write() {
            failing.remove(&table);
        }
    }

    fn read<T>(
        &self,
        table: Table,
        select: impl FnOnce(&StoreRows) -> Vec<T>,
    ) -> Result<Vec<T>, SourceError> {
        let failing = self
            .failing
            .read()
            .map_err(|_| SourceError::Unavailable(table.as_str().to_string()))?;
        if failing.contains(&table) {
            return Err(SourceError::Unavailable(table.as_str().to_string()));
        }
        let rows = self
            .rows
            .read()
            .map_err(|_| SourceError::Unavailable(table.as_str().to_string()))?;
        Ok(select(&rows))
    }
}

#[async_trait]
impl DashboardSource for InMemoryDashboardSource {
    async fn sales_between(&self, range: TimeRange) -> Result<Vec<SaleRow>, SourceError> {
        self.read(Table::Sales, |rows| {
            rows.sales
                .iter()
                .filter(|s| range.contains(s.created_at))
                .cloned()
                .collect()
        })
    }

    async fn sale_items_between(&self, range: TimeRange) -> Result<Vec<SaleItemRow>, SourceError> {
        self.read(Table::SaleItems, |rows| {
            let in_range: HashSet<SaleId> = rows
                .sales
                .iter()
                .filter(|s| range.contains(s.created_at))
                .map(|s| s.id)
                .collect();
            rows.sale_items
                .iter()
                .filter(|i| in_range.contains(&i.sale_id))
                .cloned()
                .collect()
        })
    }

    async fn products(&self) -> Result<Vec<ProductRow>, SourceError> {
        self.read(Table::Products, |rows| rows.products.clone())
    }

    async fn customers(&self) -> Result<Vec<CustomerRow>, SourceError> {
        self.read(Table::Customers, |rows| rows.customers.clone())
    }

    async fn expenses_between(&self, range: TimeRange) -> Result<Vec<ExpenseRow>, SourceError> {
        self.read(Table::Expenses, |rows| {
            rows.expenses
                .iter()
                .filter(|e| range.contains(e.expense_date))
                .cloned()
                .collect()
        })
    }

    async fn laybys(&self) -> Result<Vec<LaybyRow>, SourceError> {
        self.read(Table::Laybys, |rows| rows.laybys.clone())
    }

    async fn refunds_between(&self, range: TimeRange) -> Result<Vec<RefundRow>, SourceError> {
        self.read(Table::Refunds, |rows| {
            rows.refunds
                .iter()
                .filter(|r| range.contains(r.created_at))
                .cloned()
                .collect()
        })
    }
}

/// A week of trading for a small shop, anchored at `now`.
fn demo_rows(now: DateTime<Utc>) -> StoreRows {
    let catalog = [
        ("Espresso Beans 1kg", "BEAN-1K", "coffee", 42, 10, 14.0, 28.0),
        ("Oat Milk 1L", "OAT-1L", "dairy", 6, 12, 1.2, 2.9),
        ("Ceramic Mug", "MUG-01", "homeware", 0, 4, 3.5, 12.0),
        ("Paper Filters", "FLT-100", "coffee", 3, 5, 0.8, 3.5),
        ("Pour-over Kettle", "KET-PO", "homeware", 9, 2, 22.0, 55.0),
        ("Gift Card", "GIFT", "misc", 100, 0, 0.0, 25.0),
    ];
    let products: Vec<ProductRow> = catalog
        .iter()
        .map(|(name, sku, category, stock, threshold, cost, price)| ProductRow {
            id: ProductId::new(),
            name: name.to_string(),
            sku: sku.to_string(),
            category: Some(category.to_string()),
            stock_quantity: *stock,
            low_stock_threshold: *threshold,
            cost_price: *cost,
            selling_price: *price,
            is_active: true,
        })
        .collect();

    let customers: Vec<CustomerRow> = ["Amara", "Ben", "Chiara", "Dev"]
        .iter()
        .enumerate()
        .map(|(i, name)| CustomerRow {
            id: CustomerId::new(),
            name: name.to_string(),
            created_at: now - Duration::days(90 - 30 * i as i64),
            total_spent: 150.0 * (i as f64 + 1.0),
            last_purchase_at: Some(now - Duration::days(i as i64)),
        })
        .collect();

    let mut sales = Vec::new();
    let mut sale_items = Vec::new();
    let methods = ["cash", "card", "card", "mobile"];
    let mut totals: HashMap<SaleId, f64> = HashMap::new();
    for day in 0..7i64 {
        for n in 0..(4 + day % 3) {
            let id = SaleId::new();
            let product = &products[((day + n) % 5) as usize];
            let quantity = 1 + (n % 2);
            let total = product.selling_price * quantity as f64;
            totals.insert(id, total);
            sales.push(SaleRow {
                id,
                total_amount: total,
                subtotal: total,
                discount_amount: 0.0,
                payment_method: methods[(n % 4) as usize].to_string(),
                status: SaleStatus::Completed,
                customer_id: Some(customers[(n % 4) as usize].id),
                created_at: now - Duration::days(day) - Duration::minutes(45 * (n + 1)),
            });
            sale_items.push(SaleItemRow {
                sale_id: id,
                product_id: product.id,
                product_name: product.name.clone(),
                quantity,
                unit_price: product.selling_price,
                cost_price: product.cost_price,
            });
        }
    }

    let refunds = sales
        .iter()
        .take(1)
        .map(|s| RefundRow {
            id: RefundId::new(),
            sale_id: Some(s.id),
            amount: totals.get(&s.id).copied().unwrap_or(0.0),
            created_at: s.created_at,
        })
        .collect();

    let expenses = vec![
        ExpenseRow {
            id: ExpenseId::new(),
            amount: 120.0,
            category: "utilities".to_string(),
            expense_date: now - Duration::days(2),
        },
        ExpenseRow {
            id: ExpenseId::new(),
            amount: 60.0,
            category: "supplies".to_string(),
            expense_date: now - Duration::hours(3),
        },
    ];

    let laybys = vec![
        LaybyRow {
            id: LaybyId::new(),
            customer_id: Some(customers[0].id),
            total_amount: 55.0,
            amount_paid: 20.0,
            status: LaybyStatus::Active,
            due_date: Some(now - Duration::days(3)),
            created_at: now - Duration::days(40),
            completed_at: None,
        },
        LaybyRow {
            id: LaybyId::new(),
            customer_id: Some(customers[1].id),
            total_amount: 110.0,
            amount_paid: 50.0,
            status: LaybyStatus::Active,
            due_date: Some(now + Duration::days(20)),
            created_at: now - Duration::days(10),
            completed_at: None,
        },
    ];

    StoreRows {
        sales,
        sale_items,
        products,
        customers,
        expenses,
        laybys,
        refunds,
    }
}
