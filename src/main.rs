use localserve::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = match std::env::var("CONFIG") {
        Ok(path) => ServerConfig::from_yaml_file(path)?,
        Err(_) => ServerConfig::from_env()?,
    };

    let handle = localserve::start(cfg).await?;
    tracing::info!("Serving at {}", handle.base_url()?);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    handle.stop().await;
    Ok(())
}
