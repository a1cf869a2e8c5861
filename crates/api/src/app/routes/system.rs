use axum::{Json, http::StatusCode, response::IntoResponse};

/// Liveness probe; never touches the store.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
