use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use posdash_alerts::{AlertId, RULES};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_alerts))
        .route("/rules", get(list_rules))
        .route("/restore", post(restore_alerts))
        .route("/:id/dismiss", post(dismiss_alert))
}

/// GET /alerts?severity=&category=
pub async fn list_alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::AlertQuery>,
) -> axum::response::Response {
    let (severity, category) = match query.parse() {
        Ok(filters) => filters,
        Err(resp) => return resp,
    };
    let store = services.store();
    Json(dto::AlertListResponse {
        alerts: store.active_alerts(severity, category),
        counts: store.counts(),
    })
    .into_response()
}

/// GET /alerts/rules
///
/// The rule catalog, for documentation and UI legends.
pub async fn list_rules() -> axum::response::Response {
    Json(RULES).into_response()
}

/// POST /alerts/:id/dismiss
pub async fn dismiss_alert(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = AlertId::from(id.as_str());
    if !services.store().dismiss(&id) {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no active alert {id}"),
        );
    }
    Json(serde_json::json!({
        "dismissed": id,
        "counts": services.store().counts(),
    }))
    .into_response()
}

/// POST /alerts/restore
pub async fn restore_alerts(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let restored = services.store().restore_all();
    Json(serde_json::json!({
        "restored": restored,
        "counts": services.store().counts(),
    }))
    .into_response()
}
