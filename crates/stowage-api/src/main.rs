use stowage_core::Config;
use stowage_infra::{init_telemetry, LogFormat};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    init_telemetry(
        env!("CARGO_PKG_NAME"),
        config.environment(),
        LogFormat::for_environment(config.is_production()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Create directories, build state and routes
    let (_state, router) = stowage_api::setup::initialize_app(config.clone()).await?;

    stowage_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
