use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use servicedesk_auth::{DenyReason, TenantScopeError};

/// Map a gate denial to a response.
///
/// Forbidden and UpstreamUnavailable share one response; the role service's
/// health is not visible through the gate.
pub fn deny_response(reason: DenyReason) -> axum::response::Response {
    match reason {
        DenyReason::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
        }
        DenyReason::Forbidden | DenyReason::UpstreamUnavailable => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient role")
        }
    }
}

pub fn tenant_scope_error(field: &str, err: TenantScopeError) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_tenant_scope",
        format!("{field}: {err}"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
