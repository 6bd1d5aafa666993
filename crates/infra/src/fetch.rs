//! Data-fetch functions: one per dashboard section.
//!
//! Each function issues the reads its section needs concurrently and reduces
//! the rows through `posdash-metrics`. A failed read fails the whole section.

use posdash_metrics::{
    customer_insights, financial_health, inventory_analytics, operations_metrics,
    sales_intelligence, CustomerInsights, FinancialHealth, InventoryAnalytics, OperationsMetrics,
    ReportWindow, SalesIntelligence,
};

use crate::source::{DashboardSource, SourceError};

pub async fn fetch_sales_intelligence<S>(
    source: &S,
    window: &ReportWindow,
    daily_target: f64,
) -> Result<SalesIntelligence, SourceError>
where
    S: DashboardSource + ?Sized,
{
    let range = window.fetch_range();
    let (sales, items) =
        tokio::try_join!(source.sales_between(range), source.sale_items_between(range))?;
    Ok(sales_intelligence(window, &sales, &items, daily_target))
}

pub async fn fetch_inventory_analytics<S>(
    source: &S,
    window: &ReportWindow,
) -> Result<InventoryAnalytics, SourceError>
where
    S: DashboardSource + ?Sized,
{
    let lookback = window.lookback();
    let (products, sales, items) = tokio::try_join!(
        source.products(),
        source.sales_between(lookback),
        source.sale_items_between(lookback),
    )?;
    Ok(inventory_analytics(window, &products, &sales, &items))
}

pub async fn fetch_customer_insights<S>(
    source: &S,
    window: &ReportWindow,
) -> Result<CustomerInsights, SourceError>
where
    S: DashboardSource + ?Sized,
{
    let (customers, sales) =
        tokio::try_join!(source.customers(), source.sales_between(window.today()))?;
    Ok(customer_insights(window, &customers, &sales))
}

pub async fn fetch_operations_metrics<S>(
    source: &S,
    window: &ReportWindow,
) -> Result<OperationsMetrics, SourceError>
where
    S: DashboardSource + ?Sized,
{
    let (laybys, sales) =
        tokio::try_join!(source.laybys(), source.sales_between(window.month_to_date()))?;
    Ok(operations_metrics(window, &laybys, &sales))
}

pub async fn fetch_financial_health<S>(
    source: &S,
    window: &ReportWindow,
) -> Result<FinancialHealth, SourceError>
where
    S: DashboardSource + ?Sized,
{
    let month = window.month_to_date();
    let (sales, refunds, expenses, items) = tokio::try_join!(
        source.sales_between(month),
        source.refunds_between(month),
        source.expenses_between(month),
        source.sale_items_between(month),
    )?;
    Ok(financial_health(window, &sales, &refunds, &expenses, &items))
}
