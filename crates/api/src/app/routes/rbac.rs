//! RBAC audit endpoint for transparent authorization debugging.
//!
//! Answers "would my roles pass this declaration, and which role decides it?"

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use servicedesk_auth::RequiredRoles;

use crate::app::dto::ExplainQuery;
use crate::app::errors;
use crate::authz::SharedGate;
use crate::context::CallerContext;

/// GET /authz/explain?require=SA,L* - Explain the caller's decision for a declaration
pub async fn explain(
    Extension(gate): Extension<SharedGate>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<ExplainQuery>,
) -> axum::response::Response {
    let required = match RequiredRoles::parse(&query.require) {
        Ok(r) => r,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_declaration", e.to_string()),
    };

    let explanation = gate.explain(Some(caller.payload()), &required).await;
    (StatusCode::OK, Json(explanation)).into_response()
}
