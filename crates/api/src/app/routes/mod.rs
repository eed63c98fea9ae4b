use axum::{
    Router,
    routing::{get, post},
};

use crate::authz::{SharedGate, require_roles};

pub mod admin;
pub mod rbac;
pub mod scope;
pub mod system;

/// Router for all authenticated endpoints, each guarded by its own declaration.
pub fn router(gate: &SharedGate) -> Router {
    let any_caller = Router::new()
        .route("/whoami", get(system::whoami))
        .route("/scope", get(scope::effective_tenant))
        .route("/authz/explain", get(rbac::explain));

    let staff = Router::new().route("/scope/bulk", post(scope::bulk_import));

    Router::new()
        .merge(require_roles(any_caller, gate, &["*"]))
        .merge(require_roles(staff, gate, &["SA", "TA", "L*"]))
        .nest("/admin", require_roles(admin::router(), gate, &["SA"]))
}
