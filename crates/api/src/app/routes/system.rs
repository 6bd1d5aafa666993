use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{sse::Event as SseEvent, IntoResponse},
    Json,
};

use crate::app::errors;
use crate::app::services::{self, AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// POST /refresh
///
/// Runs a refresh cycle now and returns its report.
pub async fn refresh(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.refresh_now().await {
        Some(report) => Json(report).into_response(),
        None => errors::json_error(
            StatusCode::GATEWAY_TIMEOUT,
            "refresh_timeout",
            "refresh did not complete in time",
        ),
    }
}

pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>> {
    services::notice_sse_stream(services)
}
