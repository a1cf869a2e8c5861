//! Success envelopes.
//!
//! Writes answer `{"message", "item"}`, delete answers `{"message"}`, reads
//! answer the bare item or a bare array.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use catalog_infra::command_dispatcher::Outcome;

pub fn outcome_to_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Created(product) => (
            StatusCode::CREATED,
            Json(json!({
                "message": format!("Product {} created successfully", product.id()),
                "item": product,
            })),
        )
            .into_response(),
        Outcome::Updated(product) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Product {} updated successfully", product.id()),
                "item": product,
            })),
        )
            .into_response(),
        Outcome::Found(product) => (StatusCode::OK, Json(product)).into_response(),
        Outcome::Listed(products) => (StatusCode::OK, Json(products)).into_response(),
        Outcome::Deleted(key) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Product {} deleted successfully", key.id()),
            })),
        )
            .into_response(),
    }
}
