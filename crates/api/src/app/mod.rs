//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: refresh loop, snapshot store, source selection
//! - `routes/`: HTTP handlers (one file per area)
//! - `dto.rs`: request/response shapes
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use posdash_infra::{DashboardConfig, DashboardSource};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router from configuration (used by `main.rs`).
pub async fn build_app(config: &DashboardConfig) -> anyhow::Result<(Router, Arc<AppServices>)> {
    let source = services::connect_source(config).await?;
    Ok(build_app_with(source, config))
}

/// Build the router over an explicit source (tests, embedding).
pub fn build_app_with(
    source: Arc<dyn DashboardSource>,
    config: &DashboardConfig,
) -> (Router, Arc<AppServices>) {
    let services = Arc::new(AppServices::start(source, config));
    (router(services.clone(), config), services)
}

pub fn router(services: Arc<AppServices>, config: &DashboardConfig) -> Router {
    let mut protected = routes::router().layer(Extension(services));
    if let Some(key) = &config.api_key {
        let state = middleware::ApiKeyState {
            key: Arc::from(key.as_str()),
        };
        protected = protected.layer(axum::middleware::from_fn_with_state(
            state,
            middleware::api_key_middleware,
        ));
    }

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
