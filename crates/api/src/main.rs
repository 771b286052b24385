use anyhow::Context;

use orderdesk_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orderdesk_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = orderdesk_api::app::services::build_services(&config).await?;
    let app = orderdesk_api::app::build_app(services, &config.api_prefix);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(prefix = %config.api_prefix, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
