use serde::{Deserialize, Serialize};

use posdash_alerts::{Alert, AlertCounts, Category, Severity};
use posdash_infra::RefreshReport;
use posdash_metrics::MetricSnapshot;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    pub severity: Option<String>,
    pub category: Option<String>,
}

impl AlertQuery {
    /// Parse the optional filters; an unknown value is a 400.
    pub fn parse(
        &self,
    ) -> Result<(Option<Severity>, Option<Category>), axum::response::Response> {
        let severity = self
            .severity
            .as_deref()
            .map(str::parse::<Severity>)
            .transpose()
            .map_err(|e| {
                errors::json_error(
                    axum::http::StatusCode::BAD_REQUEST,
                    "invalid_severity",
                    e.to_string(),
                )
            })?;
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| {
                errors::json_error(
                    axum::http::StatusCode::BAD_REQUEST,
                    "invalid_category",
                    e.to_string(),
                )
            })?;
        Ok((severity, category))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub snapshot: MetricSnapshot,
    pub alerts: Vec<Alert>,
    pub counts: AlertCounts,
    pub last_refresh: Option<RefreshReport>,
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
    pub counts: AlertCounts,
}
