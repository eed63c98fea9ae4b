use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// System administrator (cross-tenant).
pub const SUPER_ADMIN: &str = "SA";
/// Tenant administrator.
pub const TENANT_ADMIN: &str = "TA";
/// First-level support agent.
pub const LEVEL_1: &str = "L1";
/// Second-level support agent.
pub const LEVEL_2: &str = "L2";
/// End user (customer side).
pub const END_USER: &str = "EU";

/// Alias token matching every system level.
pub const ANY_ROLE: &str = "*";
/// Alias token matching every support level.
pub const ANY_LEVEL: &str = "L*";

/// Ids of the DEFAULT roles that exist in every deployment.
pub const DEFAULT_ROLE_IDS: [&str; 5] = [SUPER_ADMIN, TENANT_ADMIN, LEVEL_1, LEVEL_2, END_USER];

/// Classification of a stored role.
///
/// DEFAULT roles carry one of the well-known ids above. EMPLOYEE and CUSTOMER
/// roles are defined by tenants and have arbitrary ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleKind {
    Default,
    Employee,
    Customer,
}

/// A role as returned by the role service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: String,
    pub kind: RoleKind,
}

impl RoleRecord {
    pub fn new(id: impl Into<String>, kind: RoleKind) -> Self {
        Self { id: id.into(), kind }
    }

    pub fn default_role(id: impl Into<String>) -> Self {
        Self::new(id, RoleKind::Default)
    }

    fn is_default(&self, id: &str) -> bool {
        self.kind == RoleKind::Default && self.id == id
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequiredRolesError {
    #[error("required role declaration must not be empty")]
    Empty,
}

/// Role-alias tokens an endpoint declares as sufficient for access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRoles {
    declared: BTreeSet<String>,
    expanded: BTreeSet<String>,
}

impl RequiredRoles {
    pub fn new<I, S>(tokens: I) -> Result<Self, RequiredRolesError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: BTreeSet<String> = tokens
            .into_iter()
            .map(|t| {
                let t: String = t.into();
                t.trim().to_string()
            })
            .filter(|t| !t.is_empty())
            .collect();

        if declared.is_empty() {
            return Err(RequiredRolesError::Empty);
        }

        let expanded = expand_aliases(&declared);
        Ok(Self { declared, expanded })
    }

    /// Parse a comma-separated declaration such as `"SA,L*"`.
    pub fn parse(list: &str) -> Result<Self, RequiredRolesError> {
        Self::new(list.split(','))
    }

    pub fn declared(&self) -> &BTreeSet<String> {
        &self.declared
    }

    /// The declaration after alias expansion (computed once at construction).
    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }
}

impl core::fmt::Display for RequiredRoles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tokens: Vec<&str> = self.declared.iter().map(String::as_str).collect();
        f.write_str(&tokens.join(","))
    }
}

fn alias_targets(token: &str) -> &'static [&'static str] {
    match token {
        ANY_ROLE => &[SUPER_ADMIN, TENANT_ADMIN, END_USER, ANY_LEVEL],
        ANY_LEVEL => &[LEVEL_1, LEVEL_2],
        _ => &[],
    }
}

/// Rewrite alias tokens into the role ids they stand for.
///
/// `"*"` stays in the output alongside its targets so the wildcard check still
/// sees it; `"L*"` is replaced by `L1` and `L2`. Runs to a fixed point: the
/// result does not depend on input order and expanding it again changes nothing.
pub fn expand_aliases<I, S>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: BTreeSet<String> = BTreeSet::new();
    let mut pending: Vec<String> = tokens.into_iter().map(|t| t.as_ref().to_string()).collect();

    while let Some(token) = pending.pop() {
        for target in alias_targets(&token) {
            if !out.contains(*target) {
                pending.push((*target).to_string());
            }
        }
        if token != ANY_LEVEL {
            out.insert(token);
        }
    }

    out
}

/// Whether a single role record satisfies an already expanded declaration.
///
/// Any EMPLOYEE role satisfies both `L1` and `L2`, and any CUSTOMER role
/// satisfies `EU`; `SA` and `TA` only match the DEFAULT roles with those ids.
pub fn role_satisfies(expanded: &BTreeSet<String>, role: &RoleRecord) -> bool {
    let wants = |id: &str| expanded.contains(id);

    wants(ANY_ROLE)
        || (wants(SUPER_ADMIN) && role.is_default(SUPER_ADMIN))
        || (wants(TENANT_ADMIN) && role.is_default(TENANT_ADMIN))
        || (wants(LEVEL_1) && (role.kind == RoleKind::Employee || role.is_default(LEVEL_1)))
        || (wants(LEVEL_2) && (role.kind == RoleKind::Employee || role.is_default(LEVEL_2)))
        || (wants(END_USER) && (role.kind == RoleKind::Customer || role.is_default(END_USER)))
}
