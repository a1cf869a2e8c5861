use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{
        Extension, Query,
        rejection::{BytesRejection, QueryRejection},
    },
    http::Method,
    routing::any,
};

use catalog_products::{KeyParams, Operation, RawInput, validate};

use crate::app::services::AppServices;
use crate::app::{envelope, errors};

/// Primary route.
pub const PRODUCTS_PATH: &str = "/products";
/// Compatibility route for clients of the earlier function app.
pub const LEGACY_FUNCTION_PATH: &str = "/api/ProductFunction";

pub fn router() -> Router {
    Router::new()
        .route(PRODUCTS_PATH, any(handle))
        .route(LEGACY_FUNCTION_PATH, any(handle))
}

/// Select the operation for an HTTP method (`None` -> 405).
pub fn operation_for(method: &Method) -> Option<Operation> {
    match *method {
        Method::POST => Some(Operation::Create),
        Method::GET => Some(Operation::Read),
        Method::PUT => Some(Operation::Update),
        Method::DELETE => Some(Operation::Delete),
        _ => None,
    }
}

/// Single entry point for all product operations, routed by method.
///
/// Order: store configuration (500), method (405), unreadable query or body
/// (400/413), validation (400), then one store call whose outcome is mapped
/// onto the envelope.
pub async fn handle(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> axum::response::Response {
    let (dispatcher, strictness) = match services.ready() {
        Ok(ready) => ready,
        Err(e) => return errors::config_error_to_response(e),
    };

    let Some(operation) = operation_for(&method) else {
        return errors::method_not_allowed();
    };

    let params = match query {
        Ok(Query(pairs)) => KeyParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(%operation, error = %rejection, "query rejected");
            return errors::json_error(rejection.status(), rejection.body_text());
        }
    };
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(%operation, error = %rejection, "body rejected");
            return errors::json_error(rejection.status(), rejection.body_text());
        }
    };

    let input = match operation {
        Operation::Create | Operation::Update => RawInput::Body(&body),
        Operation::Read | Operation::Delete => RawInput::Params(&params),
    };

    let request = match validate(operation, input, strictness) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(%operation, error = %e, "request rejected");
            return errors::validation_error_to_response(e);
        }
    };

    match dispatcher.dispatch(request).await {
        Ok(outcome) => envelope::outcome_to_response(outcome),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
