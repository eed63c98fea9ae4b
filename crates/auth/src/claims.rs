use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use servicedesk_core::TenantId;

/// Token type every request-bearing token must carry.
pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";

/// Decoded identity and claims of the caller (transport-agnostic).
///
/// This is what the auth service signs into an access token. Field names on
/// the wire follow the token format, not the Rust names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerPayload {
    /// Caller's user identifier.
    #[serde(rename = "sub")]
    pub subject_id: String,

    /// Role ids assigned to the caller (ids, not role records).
    #[serde(rename = "roles", default)]
    pub role_ids: BTreeSet<String>,

    /// Tenant the caller belongs to; absent for system-level accounts.
    #[serde(rename = "tenant", default, skip_serializing_if = "Option::is_none")]
    pub home_tenant: Option<TenantId>,

    #[serde(rename = "type")]
    pub token_type: String,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl CallerPayload {
    /// Whether the raw (unexpanded) role ids include `role_id`.
    pub fn has_raw_role(&self, role_id: &str) -> bool {
        self.role_ids.contains(role_id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unexpected token type '{0}'")]
    WrongType(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate decoded claims.
///
/// Signature verification happens in the [`crate::jwt`] layer; this checks the
/// token type and the validity window only.
pub fn validate_claims(claims: &CallerPayload, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.token_type != ACCESS_TOKEN {
        return Err(TokenValidationError::WrongType(claims.token_type.clone()));
    }
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
