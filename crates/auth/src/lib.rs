//! `servicedesk-auth` — role-based access gate and tenant scoping.
//!
//! This crate is intentionally decoupled from HTTP and storage. Role records
//! are reached through the [`RoleLookup`] trait.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod lookup;
pub mod roles;
pub mod tenant;

pub use authorize::{AccessGate, AuthorizationExplanation, Decision, DenyReason, RoleMatch};
pub use claims::{ACCESS_TOKEN, CallerPayload, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use lookup::{RoleLookup, RoleLookupError};
pub use roles::{RequiredRoles, RequiredRolesError, RoleKind, RoleRecord, expand_aliases, role_satisfies};
pub use tenant::{
    TenantScopeError, TenantScoped, require_tenant, require_tenant_value, resolve_tenant, resolve_tenant_value,
    scope_tenant, scope_tenants,
};
