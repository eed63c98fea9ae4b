//! Per-route role gate.
//!
//! Each protected router declares the role aliases it accepts; the gate runs
//! [`AccessGate::authorize`] before the handler and short-circuits on deny.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware::{self, Next},
    response::Response,
};

use servicedesk_auth::{AccessGate, Decision, RequiredRoles, RoleLookup};

use crate::app::errors;
use crate::context::CallerContext;

/// Gate shared by every protected route.
pub type SharedGate = Arc<AccessGate<Arc<dyn RoleLookup>>>;

#[derive(Clone)]
pub struct RoleGateState {
    gate: SharedGate,
    required: Arc<RequiredRoles>,
}

/// Build a declaration from a route's static alias list.
///
/// Route declarations are fixed in code, so an empty list is a programming
/// error caught at startup.
pub fn declare(tokens: &[&'static str]) -> RequiredRoles {
    debug_assert!(!tokens.is_empty(), "invalid route role declaration: no aliases");
    RequiredRoles::new(tokens.iter().copied())
        .unwrap_or_else(|e| panic!("invalid route role declaration {tokens:?}: {e}"))
}

/// Guard every route of `router` with the given declaration.
pub fn require_roles<S>(router: Router<S>, gate: &SharedGate, tokens: &[&'static str]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let state = RoleGateState {
        gate: gate.clone(),
        required: Arc::new(declare(tokens)),
    };
    router.route_layer(middleware::from_fn_with_state(state, role_gate_middleware))
}

pub async fn role_gate_middleware(
    State(state): State<RoleGateState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let caller = req.extensions().get::<CallerContext>().cloned();
    let decision = state
        .gate
        .authorize(caller.as_ref().map(CallerContext::payload), &state.required)
        .await;

    match decision {
        Decision::Allow { .. } => next.run(req).await,
        Decision::Deny(reason) => errors::deny_response(reason),
    }
}
