//! HTTP API application wiring (Axum router + collaborator wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use servicedesk_auth::{AccessGate, Hs256JwtValidator, RoleLookup, RoleLookupError};
use servicedesk_infra::{HttpRoleLookup, HttpRoleLookupConfig, InMemoryRoleDirectory};

use crate::authz::SharedGate;
use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Pick the role-lookup collaborator the config asks for.
pub fn role_lookup_from_config(config: &ApiConfig) -> Result<Arc<dyn RoleLookup>, RoleLookupError> {
    match &config.role_service_url {
        Some(url) => {
            let mut http = HttpRoleLookupConfig::new(url.clone(), config.role_lookup_timeout);
            http.service_token = config.role_service_token.clone();
            tracing::info!(url = %url, "using role service");
            Ok(Arc::new(HttpRoleLookup::new(http)?))
        }
        None => {
            tracing::warn!("ROLE_SERVICE_URL not set; using in-memory default roles");
            Ok(Arc::new(InMemoryRoleDirectory::with_default_roles()))
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig, lookup: Arc<dyn RoleLookup>) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let gate: SharedGate = Arc::new(AccessGate::new(lookup).with_timeout(config.role_lookup_timeout));

    // Protected routes: bearer decoding first, then each router's role gate.
    let protected = routes::router(&gate)
        .layer(Extension(gate))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
