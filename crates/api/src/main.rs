use anyhow::Context;

use cartkit_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cartkit_observability::init();

    let config = ApiConfig::from_env();
    let app = cartkit_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        summary = %config.summary_path,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
