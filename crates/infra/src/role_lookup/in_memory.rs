use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;

use servicedesk_auth::roles::DEFAULT_ROLE_IDS;
use servicedesk_auth::{RoleLookup, RoleLookupError, RoleRecord};

/// In-memory role directory for tests/dev.
#[derive(Debug)]
pub struct InMemoryRoleDirectory {
    inner: RwLock<HashMap<String, RoleRecord>>,
}

impl InMemoryRoleDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Directory holding the five DEFAULT roles every deployment ships with.
    pub fn with_default_roles() -> Self {
        let dir = Self::new();
        for id in DEFAULT_ROLE_IDS {
            dir.upsert(RoleRecord::default_role(id));
        }
        dir
    }

    pub fn upsert(&self, role: RoleRecord) {
        self.write().insert(role.id.clone(), role);
    }

    pub fn remove(&self, id: &str) -> Option<RoleRecord> {
        self.write().remove(id)
    }

    /// Writes go through even after a panic elsewhere; lookups keep failing
    /// while the lock stays poisoned.
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, RoleRecord>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("role directory lock poisoned, applying write anyway");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl Default for InMemoryRoleDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleLookup for InMemoryRoleDirectory {
    async fn fetch_roles(&self, ids: &[String]) -> Result<Vec<RoleRecord>, RoleLookupError> {
        let map = self
            .inner
            .read()
            .map_err(|_| RoleLookupError::Transport("role directory lock poisoned".to_string()))?;

        Ok(ids.iter().filter_map(|id| map.get(id).cloned()).collect())
    }
}
