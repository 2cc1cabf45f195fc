use kalsms::config::load_config;
use kalsms::server::{create_app, LoggingHandler};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    if config.auth.password.is_none() {
        anyhow::bail!("no password configured; set KALSMS_PASSWORD or auth.password");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let path = config.server.path.clone();
    let app = create_app(config, Arc::new(LoggingHandler));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("kalsms listening on http://{}{}", addr, path);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
