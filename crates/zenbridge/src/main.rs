mod bridge;
mod config;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("zenbridge=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/bridge.toml".to_string());

    let config = config::BridgeConfig::load(&config_path)?;
    tracing::info!(
        checks = config.checks.len(),
        graphite = %config.graphite.url,
        state_file = %config.bridge.state_file,
        "zenbridge starting"
    );

    let mut bridge = bridge::Bridge::new(config);
    bridge.run().await
}
