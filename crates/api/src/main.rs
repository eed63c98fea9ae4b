use anyhow::Context;

use servicedesk_api::app;
use servicedesk_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    servicedesk_observability::init();

    let config = ApiConfig::from_env()?;
    let lookup = app::role_lookup_from_config(&config)?;
    let router = app::build_app(&config, lookup);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
