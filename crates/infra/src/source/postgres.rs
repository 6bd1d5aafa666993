//! Postgres-backed row source.
//!
//! Reads the store's tables directly with one `SELECT` per call. Numeric
//! columns are cast to `float8`/`int8` in SQL so decoding does not depend on
//! whether the schema uses `numeric`, `real` or `integer`.
//!
//! ## Ownership
//!
//! The schema, its stored procedures and any realtime publication belong to
//! the hosted database; this module only reads.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use posdash_metrics::{
    CustomerRow, ExpenseRow, LaybyRow, ProductRow, RefundRow, SaleItemRow, SaleRow, TimeRange,
};

use super::{DashboardSource, SourceError, Table};

pub struct PostgresDashboardSource {
    pool: Arc<PgPool>,
}

impl PostgresDashboardSource {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a small pool; a dashboard issues a handful of reads per cycle.
    pub async fn connect(database_url: &str) -> Result<Self, SourceError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    async fn fetch_ranged<T: Send>(
        &self,
        table: Table,
        sql: &str,
        range: TimeRange,
        decode: fn(&PgRow) -> Result<T, SourceError>,
    ) -> Result<Vec<T>, SourceError> {
        let rows = sqlx::query(sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&*self.pool)
            .await?;
        debug!(table = table.as_str(), rows = rows.len(), "fetched");
        rows.iter().map(decode).collect()
    }

    async fn fetch_all<T: Send>(
        &self,
        table: Table,
        sql: &str,
        decode: fn(&PgRow) -> Result<T, SourceError>,
    ) -> Result<Vec<T>, SourceError> {
        let rows = sqlx::query(sql).fetch_all(&*self.pool).await?;
        debug!(table = table.as_str(), rows = rows.len(), "fetched");
        rows.iter().map(decode).collect()
    }
}

#[async_trait]
impl DashboardSource for PostgresDashboardSource {
    #[instrument(skip(self))]
    async fn sales_between(&self, range: TimeRange) -> Result<Vec<SaleRow>, SourceError> {
        self.fetch_ranged(
            Table::Sales,
            r#"
            SELECT
                id,
                total_amount::float8 AS total_amount,
                COALESCE(subtotal, total_amount)::float8 AS subtotal,
                COALESCE(discount_amount, 0)::float8 AS discount_amount,
                COALESCE(payment_method, 'unknown') AS payment_method,
                status,
                customer_id,
                created_at
            FROM sales
            WHERE created_at >= $1 AND created_at < $2
            ORDER BY created_at
            "#,
            range,
            decode_sale,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn sale_items_between(&self, range: TimeRange) -> Result<Vec<SaleItemRow>, SourceError> {
        self.fetch_ranged(
            Table::SaleItems,
            r#"
            SELECT
                si.sale_id,
                si.product_id,
                COALESCE(p.name, '') AS product_name,
                si.quantity::int8 AS quantity,
                si.unit_price::float8 AS unit_price,
                COALESCE(p.cost_price, 0)::float8 AS cost_price
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            LEFT JOIN products p ON p.id = si.product_id
            WHERE s.created_at >= $1 AND s.created_at < $2
            "#,
            range,
            decode_sale_item,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<ProductRow>, SourceError> {
        self.fetch_all(
            Table::Products,
            r#"
            SELECT
                id,
                name,
                COALESCE(sku, '') AS sku,
                category,
                stock_quantity::int8 AS stock_quantity,
                COALESCE(low_stock_threshold, 0)::int8 AS low_stock_threshold,
                COALESCE(cost_price, 0)::float8 AS cost_price,
                COALESCE(selling_price, 0)::float8 AS selling_price,
                COALESCE(is_active, true) AS is_active
            FROM products
            ORDER BY name
            "#,
            decode_product,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn customers(&self) -> Result<Vec<CustomerRow>, SourceError> {
        self.fetch_all(
            Table::Customers,
            r#"
            SELECT
                id,
                name,
                created_at,
                COALESCE(total_spent, 0)::float8 AS total_spent,
                last_purchase_at
            FROM customers
            "#,
            decode_customer,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn expenses_between(&self, range: TimeRange) -> Result<Vec<ExpenseRow>, SourceError> {
        self.fetch_ranged(
            Table::Expenses,
            r#"
            SELECT
                id,
                amount::float8 AS amount,
                COALESCE(category, 'uncategorized') AS category,
                expense_date::timestamptz AS expense_date
            FROM expenses
            WHERE expense_date::timestamptz >= $1 AND expense_date::timestamptz < $2
            "#,
            range,
            decode_expense,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn laybys(&self) -> Result<Vec<LaybyRow>, SourceError> {
        self.fetch_all(
            Table::Laybys,
            r#"
            SELECT
                id,
                customer_id,
                total_amount::float8 AS total_amount,
                COALESCE(amount_paid, 0)::float8 AS amount_paid,
                status,
                due_date::timestamptz AS due_date,
                created_at,
                completed_at
            FROM laybys
            "#,
            decode_layby,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn refunds_between(&self, range: TimeRange) -> Result<Vec<RefundRow>, SourceError> {
        self.fetch_ranged(
            Table::Refunds,
            r#"
            SELECT id, sale_id, amount::float8 AS amount, created_at
            FROM refunds
            WHERE created_at >= $1 AND created_at < $2
            "#,
            range,
            decode_refund,
        )
        .await
    }
}

fn decode_sale(row: &PgRow) -> Result<SaleRow, SourceError> {
    let status: String = row.try_get("status")?;
    Ok(SaleRow {
        id: row.try_get::<Uuid, _>("id")?.into(),
        total_amount: row.try_get("total_amount")?,
        subtotal: row.try_get("subtotal")?,
        discount_amount: row.try_get("discount_amount")?,
        payment_method: row.try_get("payment_method")?,
        status: status
            .parse()
            .map_err(|e| SourceError::decode(Table::Sales, format!("{e}")))?,
        customer_id: row.try_get::<Option<Uuid>, _>("customer_id")?.map(Into::into),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn decode_sale_item(row: &PgRow) -> Result<SaleItemRow, SourceError> {
    Ok(SaleItemRow {
        sale_id: row.try_get::<Uuid, _>("sale_id")?.into(),
        product_id: row.try_get::<Uuid, _>("product_id")?.into(),
        product_name: row.try_get("product_name")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        cost_price: row.try_get("cost_price")?,
    })
}

fn decode_product(row: &PgRow) -> Result<ProductRow, SourceError> {
    Ok(ProductRow {
        id: row.try_get::<Uuid, _>("id")?.into(),
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        category: row.try_get("category")?,
        stock_quantity: row.try_get("stock_quantity")?,
        low_stock_threshold: row.try_get("low_stock_threshold")?,
        cost_price: row.try_get("cost_price")?,
        selling_price: row.try_get("selling_price")?,
        is_active: row.try_get("is_active")?,
    })
}

fn decode_customer(row: &PgRow) -> Result<CustomerRow, SourceError> {
    Ok(CustomerRow {
        id: row.try_get::<Uuid, _>("id")?.into(),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        total_spent: row.try_get("total_spent")?,
        last_purchase_at: row.try_get("last_purchase_at")?,
    })
}

fn decode_expense(row: &PgRow) -> Result<ExpenseRow, SourceError> {
    Ok(ExpenseRow {
        id: row.try_get::<Uuid, _>("id")?.into(),
        amount: row.try_get("amount")?,
        category: row.try_get("category")?,
        expense_date: row.try_get("expense_date")?,
    })
}

fn decode_layby(row: &PgRow) -> Result<LaybyRow, SourceError> {
    let status: String = row.try_get("status")?;
    Ok(LaybyRow {
        id: row.try_get::<Uuid, _>("id")?.into(),
        customer_id: row.try_get::<Option<Uuid>, _>("customer_id")?.map(Into::into),
        total_amount: row.try_get("total_amount")?,
        amount_paid: row.try_get("amount_paid")?,
        status: status
            .parse()
            .map_err(|e| SourceError::decode(Table::Laybys, format!("{e}")))?,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}

fn decode_refund(row: &PgRow) -> Result<RefundRow, SourceError> {
    Ok(RefundRow {
        id: row.try_get::<Uuid, _>("id")?.into(),
        sale_id: row.try_get::<Option<Uuid>, _>("sale_id")?.map(Into::into),
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
    })
}
