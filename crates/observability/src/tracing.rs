//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Service crates log at debug, HTTP plumbing only from warn up.
pub const DEFAULT_FILTER: &str =
    "info,servicedesk_api=debug,servicedesk_auth=debug,servicedesk_infra=debug,hyper=warn,reqwest=warn";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`] when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    // One JSON object per line; the target shows which gate or adapter logged.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .flatten_event(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .try_init();
}
