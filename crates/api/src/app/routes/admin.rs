//! System-admin routes.

use axum::{Json, Router, extract::Extension, response::IntoResponse, routing::get};

use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new().route("/ping", get(ping))
}

/// GET /admin/ping - Reachable by SA callers only
pub async fn ping(Extension(caller): Extension<CallerContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "pong": true,
        "subject_id": caller.payload().subject_id,
    }))
}
