//! The metric snapshot: every section computed from one fetch cycle.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posdash_core::DomainError;

use crate::customers::{customer_insights, CustomerInsights};
use crate::financial::{financial_health, FinancialHealth};
use crate::inventory::{inventory_analytics, InventoryAnalytics};
use crate::operations::{operations_metrics, OperationsMetrics};
use crate::rows::{
    CustomerRow, ExpenseRow, LaybyRow, ProductRow, RefundRow, SaleItemRow, SaleRow,
};
use crate::sales::{sales_intelligence, SalesIntelligence};
use crate::window::ReportWindow;

/// One section of the snapshot (one fetch function each).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Sales,
    Inventory,
    Customers,
    Operations,
    Financial,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Sales,
        Section::Inventory,
        Section::Customers,
        Section::Operations,
        Section::Financial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Sales => "sales",
            Section::Inventory => "inventory",
            Section::Customers => "customers",
            Section::Operations => "operations",
            Section::Financial => "financial",
        }
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| DomainError::unknown("section", s))
    }
}

/// Aggregate metrics captured at one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub captured_at: DateTime<Utc>,
    pub sales: SalesIntelligence,
    pub inventory: InventoryAnalytics,
    pub customers: CustomerInsights,
    pub operations: OperationsMetrics,
    pub financial: FinancialHealth,
}

impl MetricSnapshot {
    /// All-zero snapshot; what a section falls back to when it has never loaded.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            sales: SalesIntelligence::default(),
            inventory: InventoryAnalytics::default(),
            customers: CustomerInsights::default(),
            operations: OperationsMetrics::default(),
            financial: FinancialHealth::default(),
        }
    }
}

/// Every row a full refresh needs, already fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreRows {
    pub sales: Vec<SaleRow>,
    pub sale_items: Vec<SaleItemRow>,
    pub products: Vec<ProductRow>,
    pub customers: Vec<CustomerRow>,
    pub expenses: Vec<ExpenseRow>,
    pub laybys: Vec<LaybyRow>,
    pub refunds: Vec<RefundRow>,
}

impl StoreRows {
    /// Compute all sections in one pass over the same rows.
    pub fn snapshot(&self, window: &ReportWindow, daily_target: f64) -> MetricSnapshot {
        MetricSnapshot {
            captured_at: window.now,
            sales: sales_intelligence(window, &self.sales, &self.sale_items, daily_target),
            inventory: inventory_analytics(window, &self.products, &self.sales, &self.sale_items),
            customers: customer_insights(window, &self.customers, &self.sales),
            operations: operations_metrics(window, &self.laybys, &self.sales),
            financial: financial_health(
                window,
                &self.sales,
                &self.refunds,
                &self.expenses,
                &self.sale_items,
            ),
        }
    }
}
