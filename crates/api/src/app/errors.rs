use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Nothing has been refreshed yet (first cycle still running or failed to start).
pub fn not_ready() -> axum::response::Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "not_ready",
        "no snapshot has been loaded yet",
    )
}
