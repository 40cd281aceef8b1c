use anyhow::Context;

use hrdesk_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hrdesk_observability::init();

    let config = ApiConfig::load().context("invalid configuration")?;
    tracing::info!(?config, "configuration loaded");

    let services = app::services::build_services(&config)
        .await
        .context("failed to initialize services")?;
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
