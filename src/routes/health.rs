//! The health check route.

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Report that the server is up and serving requests.
pub async fn get_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
