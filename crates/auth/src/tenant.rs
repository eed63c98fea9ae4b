//! Tenant scoping for request fields named `tenant`.
//!
//! Callers without the system-admin role are pinned to their own tenant no
//! matter what they send. System admins may address any tenant. Resolution
//! never fails and runs on the undecoded value, so a pinned caller's bad input
//! is discarded unseen; whether the resulting value is acceptable is decided by
//! [`require_tenant`] or [`require_tenant_value`] afterwards.

use serde_json::Value;
use thiserror::Error;

use servicedesk_core::TenantId;

use crate::claims::CallerPayload;
use crate::roles::SUPER_ADMIN;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TenantScopeError {
    #[error("tenant is required")]
    Missing,

    #[error("tenant must not be empty")]
    Empty,

    #[error("tenant must be a string")]
    NotAString,
}

/// Effective tenant for a request.
///
/// Looks at the raw role ids only; `SA` must be assigned directly.
pub fn resolve_tenant(payload: &CallerPayload, supplied: Option<&str>) -> Option<String> {
    if payload.has_raw_role(SUPER_ADMIN) {
        supplied.map(str::to_owned)
    } else {
        payload.home_tenant.as_ref().map(|t| t.as_str().to_owned())
    }
}

/// [`resolve_tenant`] over a JSON value that has not been type-checked yet.
pub fn resolve_tenant_value(payload: &CallerPayload, supplied: Option<Value>) -> Option<Value> {
    if payload.has_raw_role(SUPER_ADMIN) {
        supplied
    } else {
        payload
            .home_tenant
            .as_ref()
            .map(|t| Value::String(t.as_str().to_owned()))
    }
}

/// A request body that carries a raw `tenant` field.
pub trait TenantScoped {
    fn tenant_mut(&mut self) -> &mut Option<Value>;
}

/// Rewrite the `tenant` field of one value in place.
pub fn scope_tenant<T: TenantScoped>(payload: &CallerPayload, value: &mut T) {
    let field = value.tenant_mut();
    *field = resolve_tenant_value(payload, field.take());
}

/// Rewrite the `tenant` field of every element independently (bulk imports).
pub fn scope_tenants<T: TenantScoped>(payload: &CallerPayload, values: &mut [T]) {
    for value in values.iter_mut() {
        scope_tenant(payload, value);
    }
}

/// Mandatory-field check applied after resolution.
pub fn require_tenant(resolved: Option<String>) -> Result<TenantId, TenantScopeError> {
    let raw = resolved.ok_or(TenantScopeError::Missing)?;
    TenantId::parse(&raw).map_err(|_| TenantScopeError::Empty)
}

/// [`require_tenant`] for a resolved JSON value; `null` counts as missing.
pub fn require_tenant_value(resolved: Option<Value>) -> Result<TenantId, TenantScopeError> {
    match resolved {
        None | Some(Value::Null) => Err(TenantScopeError::Missing),
        Some(Value::String(raw)) => require_tenant(Some(raw)),
        Some(_) => Err(TenantScopeError::NotAString),
    }
}
