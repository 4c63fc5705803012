use anyhow::{Error, Result, anyhow};
use push_dispatcher::{
    api::run_api_server,
    config::{Config, ConfigSource},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    info!(project_id = %config.fcm_project_id, "Configuration validated");

    run_api_server(config.server_port, ConfigSource::Environment)
        .await
        .map_err(|e| anyhow!("Server error: {}", e))
}
