use anyhow::Result;
use cardscan_api::{setup, telemetry};
use cardscan_core::Config;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before configuration so missing-variable warnings are visible.
    let log_level = telemetry::init_telemetry()?;

    let config = Config::from_env()?;
    if config.debug() {
        log_level.enable_debug()?;
    }

    let (_state, app) = setup::initialize_app(&config).await?;
    setup::server::start_server(&config, app).await?;

    Ok(())
}
