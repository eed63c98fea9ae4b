//! Service configuration, read from the environment once at startup.

use std::time::Duration;

use thiserror::Error;

use servicedesk_auth::authorize::DEFAULT_LOOKUP_TIMEOUT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Base URL of the role service; `None` selects the in-memory directory.
    pub role_service_url: Option<String>,
    pub role_service_token: Option<String>,
    pub role_lookup_timeout: Duration,
}

impl ApiConfig {
    /// Defaults with the given signing secret (tests/dev).
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: jwt_secret.into(),
            role_service_url: None,
            role_service_token: None,
            role_lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// Keys: `JWT_SECRET`, `BIND_ADDR`, `ROLE_SERVICE_URL`, `ROLE_SERVICE_TOKEN`,
    /// `ROLE_LOOKUP_TIMEOUT_MS`.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = non_empty("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let role_lookup_timeout = match non_empty("ROLE_LOOKUP_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "ROLE_LOOKUP_TIMEOUT_MS",
                    reason: format!("'{raw}' is not a whole number of milliseconds"),
                })?;
                if ms == 0 {
                    return Err(ConfigError::Invalid {
                        name: "ROLE_LOOKUP_TIMEOUT_MS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_LOOKUP_TIMEOUT,
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            role_service_url: non_empty("ROLE_SERVICE_URL"),
            role_service_token: non_empty("ROLE_SERVICE_TOKEN"),
            role_lookup_timeout,
        })
    }
}
