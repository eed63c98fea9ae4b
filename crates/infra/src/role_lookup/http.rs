//! Client for the sibling role service.
//!
//! Wire contract: `POST {base_url}/roles/lookup` with `{"ids": [...]}`,
//! answered by `{"roles": [{"id": "..", "kind": "DEFAULT|EMPLOYEE|CUSTOMER"}]}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use servicedesk_auth::{RoleLookup, RoleLookupError, RoleRecord};

#[derive(Debug, Clone)]
pub struct HttpRoleLookupConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Bearer token presented to the role service, if it requires one.
    pub service_token: Option<String>,
}

impl HttpRoleLookupConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            service_token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    roles: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct HttpRoleLookup {
    client: reqwest::Client,
    url: String,
    service_token: Option<String>,
}

impl HttpRoleLookup {
    pub fn new(config: HttpRoleLookupConfig) -> Result<Self, RoleLookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RoleLookupError::Transport(e.to_string()))?;

        let url = format!("{}/roles/lookup", config.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            url,
            service_token: config.service_token,
        })
    }
}

fn transport_error(e: reqwest::Error) -> RoleLookupError {
    if e.is_timeout() {
        RoleLookupError::Timeout
    } else {
        RoleLookupError::Transport(e.to_string())
    }
}

#[async_trait]
impl RoleLookup for HttpRoleLookup {
    async fn fetch_roles(&self, ids: &[String]) -> Result<Vec<RoleRecord>, RoleLookupError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut req = self.client.post(&self.url).json(&json!({ "ids": ids }));
        if let Some(token) = &self.service_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RoleLookupError::Status(status.as_u16()));
        }

        let body: LookupResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                RoleLookupError::Timeout
            } else {
                RoleLookupError::Decode(e.to_string())
            }
        })?;

        // A record that does not parse can never match; drop it and keep the rest.
        let roles = body
            .roles
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<RoleRecord>(raw) {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unparseable role record");
                    None
                }
            })
            .collect();

        Ok(roles)
    }
}
