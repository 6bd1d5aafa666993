//! Row sources: where the dashboard reads store data from.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use posdash_metrics::{
    CustomerRow, ExpenseRow, LaybyRow, ProductRow, RefundRow, SaleItemRow, SaleRow, TimeRange,
};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryDashboardSource;
pub use postgres::PostgresDashboardSource;

/// Remote tables the dashboard reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Table {
    Sales,
    SaleItems,
    Products,
    Customers,
    Expenses,
    Laybys,
    Refunds,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Sales => "sales",
            Table::SaleItems => "sale_items",
            Table::Products => "products",
            Table::Customers => "customers",
            Table::Expenses => "expenses",
            Table::Laybys => "laybys",
            Table::Refunds => "refunds",
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not decode {table} row: {message}")]
    Decode { table: &'static str, message: String },

    #[error("{0} unavailable")]
    Unavailable(String),
}

impl SourceError {
    pub fn decode(table: Table, message: impl Into<String>) -> Self {
        Self::Decode {
            table: table.as_str(),
            message: message.into(),
        }
    }
}

/// Read-only access to the store's tables.
///
/// Time-filtered reads use half-open ranges on the row's own timestamp
/// (`sale_items` are filtered by their parent sale's `created_at`).
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn sales_between(&self, range: TimeRange) -> Result<Vec<SaleRow>, SourceError>;
    async fn sale_items_between(&self, range: TimeRange) -> Result<Vec<SaleItemRow>, SourceError>;
    async fn products(&self) -> Result<Vec<ProductRow>, SourceError>;
    async fn customers(&self) -> Result<Vec<CustomerRow>, SourceError>;
    async fn expenses_between(&self, range: TimeRange) -> Result<Vec<ExpenseRow>, SourceError>;
    async fn laybys(&self) -> Result<Vec<LaybyRow>, SourceError>;
    async fn refunds_between(&self, range: TimeRange) -> Result<Vec<RefundRow>, SourceError>;
}

#[async_trait]
impl<S> DashboardSource for Arc<S>
where
    S: DashboardSource + ?Sized,
{
    async fn sales_between(&self, range: TimeRange) -> Result<Vec<SaleRow>, SourceError> {
        (**self).sales_between(range).await
    }

    async fn sale_items_between(&self, range: TimeRange) -> Result<Vec<SaleItemRow>, SourceError> {
        (**self).sale_items_between(range).await
    }

    async fn products(&self) -> Result<Vec<ProductRow>, SourceError> {
        (**self).products().await
    }

    async fn customers(&self) -> Result<Vec<CustomerRow>, SourceError> {
        (**self).customers().await
    }

    async fn expenses_between(&self, range: TimeRange) -> Result<Vec<ExpenseRow>, SourceError> {
        (**self).expenses_between(range).await
    }

    async fn laybys(&self) -> Result<Vec<LaybyRow>, SourceError> {
        (**self).laybys().await
    }

    async fn refunds_between(&self, range: TimeRange) -> Result<Vec<RefundRow>, SourceError> {
        (**self).refunds_between(range).await
    }
}
