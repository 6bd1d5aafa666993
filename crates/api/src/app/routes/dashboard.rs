use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use posdash_metrics::Section;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_dashboard))
        .route("/:section", get(get_section))
}

/// GET /dashboard
///
/// Full snapshot plus active alerts and their counts.
pub async fn get_dashboard(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let store = services.store();
    let Some(snapshot) = store.snapshot() else {
        return errors::not_ready();
    };

    Json(dto::DashboardResponse {
        snapshot,
        alerts: store.active_alerts(None, None),
        counts: store.counts(),
        last_refresh: store.last_report(),
    })
    .into_response()
}

/// GET /dashboard/:section
pub async fn get_section(
    Extension(services): Extension<Arc<AppServices>>,
    Path(section): Path<String>,
) -> axum::response::Response {
    let section: Section = match section.parse() {
        Ok(s) => s,
        Err(e) => {
            return errors::json_error(StatusCode::NOT_FOUND, "unknown_section", format!("{e}"));
        }
    };
    let Some(snapshot) = services.store().snapshot() else {
        return errors::not_ready();
    };

    let body = match section {
        Section::Sales => serde_json::to_value(&snapshot.sales),
        Section::Inventory => serde_json::to_value(&snapshot.inventory),
        Section::Customers => serde_json::to_value(&snapshot.customers),
        Section::Operations => serde_json::to_value(&snapshot.operations),
        Section::Financial => serde_json::to_value(&snapshot.financial),
    };
    match body {
        Ok(value) => Json(serde_json::json!({
            "section": section,
            "captured_at": snapshot.captured_at,
            "metrics": value,
        }))
        .into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "serialize_error",
            e.to_string(),
        ),
    }
}
