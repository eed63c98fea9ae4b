//! Endpoints applying the tenant-field convention.
//!
//! Every `tenant` value from the query or body is resolved against the
//! caller before any field validation runs.

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use servicedesk_auth::{require_tenant, require_tenant_value, resolve_tenant, scope_tenants};

use crate::app::dto::{BulkImportRequest, BulkImportResponse, ScopeQuery, ScopeResponse};
use crate::app::errors;
use crate::context::CallerContext;

/// GET /scope?tenant= - Effective tenant for the caller
pub async fn effective_tenant(
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<ScopeQuery>,
) -> axum::response::Response {
    let payload = caller.payload();
    let resolved = resolve_tenant(payload, query.tenant.as_deref());

    match require_tenant(resolved) {
        Ok(tenant) => (
            StatusCode::OK,
            Json(ScopeResponse {
                subject_id: payload.subject_id.clone(),
                tenant: tenant.to_string(),
            }),
        )
            .into_response(),
        Err(e) => errors::tenant_scope_error("tenant", e),
    }
}

/// POST /scope/bulk - Resolve and validate the tenant of every import row
pub async fn bulk_import(
    Extension(caller): Extension<CallerContext>,
    Json(mut body): Json<BulkImportRequest>,
) -> axum::response::Response {
    scope_tenants(caller.payload(), &mut body.items);

    for (idx, item) in body.items.iter_mut().enumerate() {
        match require_tenant_value(item.tenant.take()) {
            Ok(tenant) => item.tenant = Some(String::from(tenant).into()),
            Err(e) => return errors::tenant_scope_error(&format!("items[{idx}].tenant"), e),
        }
    }

    tracing::debug!(
        subject = %caller.payload().subject_id,
        rows = body.items.len(),
        "bulk import rows scoped"
    );

    (StatusCode::OK, Json(BulkImportResponse { items: body.items })).into_response()
}
