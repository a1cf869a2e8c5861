use std::sync::Arc;

use axum::{Router, extract::Extension};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::ServiceConfig;
use crate::middleware;

pub mod envelope;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full router from configuration.
pub fn build_app(config: &ServiceConfig) -> Router {
    build_app_with_services(AppServices::build(config))
}

/// Build the router around already-constructed services (tests inject stores here).
pub fn build_app_with_services(services: AppServices) -> Router {
    routes::router().layer(Extension(Arc::new(services))).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_span))
            .layer(CatchPanicLayer::custom(errors::panic_to_response)),
    )
}
