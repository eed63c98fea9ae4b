use serde::{Deserialize, Serialize};

use servicedesk_auth::TenantScoped;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    pub tenant: Option<String>,
}

/// One element of a bulk import; fields other than `tenant` pass through.
///
/// `tenant` stays undecoded until it has been resolved against the caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportItem {
    #[serde(default)]
    pub tenant: Option<serde_json::Value>,

    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl TenantScoped for ImportItem {
    fn tenant_mut(&mut self) -> &mut Option<serde_json::Value> {
        &mut self.tenant
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub items: Vec<ImportItem>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    /// Comma-separated role aliases, e.g. `SA,L*`.
    pub require: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ScopeResponse {
    pub subject_id: String,
    pub tenant: String,
}

#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
    pub items: Vec<ImportItem>,
}
