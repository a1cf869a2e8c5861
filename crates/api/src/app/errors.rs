use std::any::Any;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use catalog_core::ValidationError;
use catalog_infra::command_dispatcher::DispatchError;
use catalog_infra::config::ConfigError;

/// Methods accepted on the product routes (advertised on 405).
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

pub fn dispatch_error_to_response(err: DispatchError) -> Response {
    match err {
        DispatchError::AlreadyExists(key) => json_error(
            StatusCode::CONFLICT,
            format!("Product {} already exists", key.id()),
        ),
        DispatchError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Product not found"),
        DispatchError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub fn validation_error_to_response(err: ValidationError) -> Response {
    json_error(StatusCode::BAD_REQUEST, err.to_string())
}

pub fn config_error_to_response(err: &ConfigError) -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub fn method_not_allowed() -> Response {
    let mut response = json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    response.headers_mut().insert(
        header::ALLOW,
        header::HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}

/// Used by the catch-panic layer.
pub fn panic_to_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
