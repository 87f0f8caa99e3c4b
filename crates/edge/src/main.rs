use anyhow::Context;

use revhub_edge::app::build_app;
use revhub_edge::config::EdgeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    revhub_observability::init();

    let config = EdgeConfig::from_env().context("invalid edge configuration")?;
    let listen = config.listen.clone();

    let app = build_app(config);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
