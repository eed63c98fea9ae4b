//! Role-lookup seam: resolves role ids into role records.
//!
//! The gate only depends on this trait; the role service client and the
//! in-memory directory live in `servicedesk-infra`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::roles::RoleRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleLookupError {
    #[error("role service unreachable: {0}")]
    Transport(String),

    #[error("role service returned status {0}")]
    Status(u16),

    #[error("role service response could not be decoded: {0}")]
    Decode(String),

    #[error("role lookup timed out")]
    Timeout,
}

/// Fetches role records by id.
///
/// Ids that do not exist are omitted from the result rather than reported as
/// an error.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn fetch_roles(&self, ids: &[String]) -> Result<Vec<RoleRecord>, RoleLookupError>;
}

#[async_trait]
impl<L> RoleLookup for Arc<L>
where
    L: RoleLookup + ?Sized,
{
    async fn fetch_roles(&self, ids: &[String]) -> Result<Vec<RoleRecord>, RoleLookupError> {
        (**self).fetch_roles(ids).await
    }
}
