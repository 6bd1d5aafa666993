//! Row shapes returned by the store database.
//!
//! Money is kept as `f64` currency units, exactly as the remote API returns it.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posdash_core::{CustomerId, DomainError, ExpenseId, LaybyId, ProductId, RefundId, SaleId};

/// Lifecycle status of a till transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    Refunded,
    Voided,
    Pending,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "completed",
            SaleStatus::Refunded => "refunded",
            SaleStatus::Voided => "voided",
            SaleStatus::Pending => "pending",
        }
    }
}

impl FromStr for SaleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(SaleStatus::Completed),
            "refunded" => Ok(SaleStatus::Refunded),
            "voided" | "void" => Ok(SaleStatus::Voided),
            "pending" => Ok(SaleStatus::Pending),
            other => Err(DomainError::unknown("sale status", other)),
        }
    }
}

/// A row of the `sales` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRow {
    pub id: SaleId,
    pub total_amount: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub payment_method: String,
    pub status: SaleStatus,
    pub customer_id: Option<CustomerId>,
    pub created_at: DateTime<Utc>,
}

impl SaleRow {
    pub fn is_completed(&self) -> bool {
        self.status == SaleStatus::Completed
    }
}

/// A row of the `sale_items` table (one product line of a sale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemRow {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub cost_price: f64,
}

impl SaleItemRow {
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    pub fn cost(&self) -> f64 {
        self.quantity as f64 * self.cost_price
    }
}

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
    pub cost_price: f64,
    pub selling_price: f64,
    pub is_active: bool,
}

impl ProductRow {
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity <= 0
    }

    /// In stock but at or below the product's restock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity > 0 && self.stock_quantity <= self.low_stock_threshold
    }
}

/// A row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: CustomerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub total_spent: f64,
    pub last_purchase_at: Option<DateTime<Utc>>,
}

/// A row of the `expenses` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub amount: f64,
    pub category: String,
    pub expense_date: DateTime<Utc>,
}

/// Lifecycle status of a layby.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaybyStatus {
    Active,
    Completed,
    Cancelled,
    Overdue,
}

impl LaybyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaybyStatus::Active => "active",
            LaybyStatus::Completed => "completed",
            LaybyStatus::Cancelled => "cancelled",
            LaybyStatus::Overdue => "overdue",
        }
    }

    /// Still collecting payments.
    pub fn is_open(&self) -> bool {
        matches!(self, LaybyStatus::Active | LaybyStatus::Overdue)
    }
}

impl FromStr for LaybyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(LaybyStatus::Active),
            "completed" => Ok(LaybyStatus::Completed),
            "cancelled" | "canceled" => Ok(LaybyStatus::Cancelled),
            "overdue" => Ok(LaybyStatus::Overdue),
            other => Err(DomainError::unknown("layby status", other)),
        }
    }
}

/// A row of the `laybys` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaybyRow {
    pub id: LaybyId,
    pub customer_id: Option<CustomerId>,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub status: LaybyStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LaybyRow {
    /// Amount still owed; never negative (overpayments count as settled).
    pub fn balance(&self) -> f64 {
        (self.total_amount - self.amount_paid).max(0.0)
    }

    /// Overdue if flagged by the backend, or still active past its due date.
    pub fn is_overdue(&self, today_start: DateTime<Utc>) -> bool {
        match self.status {
            LaybyStatus::Overdue => true,
            LaybyStatus::Active => self.due_date.is_some_and(|d| d < today_start),
            _ => false,
        }
    }
}

/// A row of the `refunds` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRow {
    pub id: RefundId,
    pub sale_id: Option<SaleId>,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}
