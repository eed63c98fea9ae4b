use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

use crate::claims::CallerPayload;
use crate::lookup::{RoleLookup, RoleLookupError};
use crate::roles::{RequiredRoles, RoleRecord, role_satisfies};

/// Default upper bound on a role-service round trip.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No caller payload was attached to the request.
    Unauthenticated,
    /// The caller's roles were resolved but none satisfied the declaration.
    Forbidden,
    /// The role lookup failed or timed out.
    UpstreamUnavailable,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow { matched_role: String },
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }
}

/// Role-based gate in front of protected endpoints.
///
/// Holds no per-request state: every call resolves the caller's roles afresh
/// through the lookup and evaluates the declaration against them.
#[derive(Debug, Clone)]
pub struct AccessGate<L> {
    lookup: L,
    timeout: Duration,
}

impl<L: RoleLookup> AccessGate<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Decide whether `payload` satisfies `required`.
    ///
    /// - Absent payload denies without touching the role service.
    /// - Lookup failure or timeout denies (fail closed).
    /// - Otherwise allows if any resolved role matches.
    pub async fn authorize(&self, payload: Option<&CallerPayload>, required: &RequiredRoles) -> Decision {
        let Some(payload) = payload else {
            tracing::debug!(required = %required, "deny: no caller payload");
            return Decision::Deny(DenyReason::Unauthenticated);
        };

        let roles = match self.fetch(payload).await {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(
                    subject = %payload.subject_id,
                    required = %required,
                    error = %e,
                    "deny: role lookup failed"
                );
                return Decision::Deny(DenyReason::UpstreamUnavailable);
            }
        };

        match roles.iter().find(|r| role_satisfies(required.expanded(), r)) {
            Some(role) => {
                tracing::debug!(subject = %payload.subject_id, required = %required, role = %role.id, "allow");
                Decision::Allow {
                    matched_role: role.id.clone(),
                }
            }
            None => {
                tracing::info!(subject = %payload.subject_id, required = %required, "deny: no matching role");
                Decision::Deny(DenyReason::Forbidden)
            }
        }
    }

    /// Explain the decision [`Self::authorize`] would make, role by role.
    pub async fn explain(&self, payload: Option<&CallerPayload>, required: &RequiredRoles) -> AuthorizationExplanation {
        let mut explanation = AuthorizationExplanation {
            declared: required.declared().clone(),
            expanded: required.expanded().clone(),
            subject_id: payload.map(|p| p.subject_id.clone()),
            role_ids: payload.map(|p| p.role_ids.clone()).unwrap_or_default(),
            roles: Vec::new(),
            granted: false,
            denial: None,
            lookup_error: None,
        };

        let Some(payload) = payload else {
            explanation.denial = Some(DenyReason::Unauthenticated);
            return explanation;
        };

        match self.fetch(payload).await {
            Ok(roles) => {
                explanation.roles = roles
                    .into_iter()
                    .map(|role| RoleMatch {
                        matches: role_satisfies(required.expanded(), &role),
                        role,
                    })
                    .collect();
                explanation.granted = explanation.roles.iter().any(|m| m.matches);
                if !explanation.granted {
                    explanation.denial = Some(DenyReason::Forbidden);
                }
            }
            Err(e) => {
                explanation.denial = Some(DenyReason::UpstreamUnavailable);
                explanation.lookup_error = Some(e.to_string());
            }
        }

        explanation
    }

    /// Resolve the caller's own role ids.
    ///
    /// Records for ids the caller does not hold are dropped, whatever the
    /// lookup returns.
    async fn fetch(&self, payload: &CallerPayload) -> Result<Vec<RoleRecord>, RoleLookupError> {
        let ids: Vec<String> = payload.role_ids.iter().cloned().collect();
        let roles = match tokio::time::timeout(self.timeout, self.lookup.fetch_roles(&ids)).await {
            Ok(result) => result?,
            Err(_) => return Err(RoleLookupError::Timeout),
        };

        Ok(roles
            .into_iter()
            .filter(|role| {
                let assigned = payload.role_ids.contains(&role.id);
                if !assigned {
                    tracing::warn!(
                        subject = %payload.subject_id,
                        role = %role.id,
                        "ignoring role record not assigned to caller"
                    );
                }
                assigned
            })
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub declared: BTreeSet<String>,
    pub expanded: BTreeSet<String>,
    pub subject_id: Option<String>,
    pub role_ids: BTreeSet<String>,
    /// Resolved role records and whether each one satisfies the declaration.
    pub roles: Vec<RoleMatch>,
    pub granted: bool,
    pub denial: Option<DenyReason>,
    pub lookup_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleMatch {
    pub role: RoleRecord,
    pub matches: bool,
}
