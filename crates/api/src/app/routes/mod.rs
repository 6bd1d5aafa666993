use axum::{
    routing::{get, post},
    Router,
};

pub mod alerts;
pub mod dashboard;
pub mod system;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/stream", get(system::stream))
        .route("/refresh", post(system::refresh))
        .nest("/dashboard", dashboard::router())
        .nest("/alerts", alerts::router())
}
