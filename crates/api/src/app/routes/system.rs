use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::CallerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(caller): Extension<CallerContext>) -> impl IntoResponse {
    let payload = caller.payload();
    Json(serde_json::json!({
        "subject_id": payload.subject_id,
        "roles": payload.role_ids,
        "home_tenant": payload.home_tenant,
    }))
}
