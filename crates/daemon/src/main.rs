//! Fortress Ops - Main Entry Point
//! Game data API + management API in one process

mod logging;
mod settings;
mod wiring;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use fortress_api_http::{
    GameApiHandler, HttpServer, HttpServerConfig, ManagementHandler, RunningServer,
};
use fortress_core::port::time_provider::SystemTimeProvider;
use fortress_core::port::TimeProvider;
use fortress_infra_system::{
    EnvFileStore, FsGameDataSource, ProcessCommandRunner, ReqwestHttpProbe,
};
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let _log_guard = logging::init_logging().context("Failed to initialize logging")?;

    info!("Fortress Ops v{} starting...", VERSION);

    // 2. Load configuration
    let settings = Settings::load()?;
    info!(
        base_dir = %settings.base_dir.display(),
        output_dir = %settings.game.output_dir.display(),
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let runner = Arc::new(ProcessCommandRunner::new(
        time_provider.clone(),
        &settings.base_dir,
    ));
    let http = Arc::new(ReqwestHttpProbe::new().context("Failed to create HTTP client")?);
    let game_data = Arc::new(FsGameDataSource::new(
        &settings.game.output_dir,
        &settings.game.saves_dir,
        &settings.game.logs_dir,
    ));
    let env_store = Arc::new(EnvFileStore::new(settings.env_file()));

    let ctx = Arc::new(wiring::build_context(
        &settings,
        runner,
        http,
        game_data,
        env_store,
        time_provider,
    ));

    // 4. Sample export so the dashboard has data before the first game export
    if settings.game.seed_sample_data {
        if let Err(e) = ctx.game.seed_sample_data().await {
            warn!(error = %e, "Failed to write sample fortress data");
        }
    }

    // 5. Start HTTP servers
    let mut servers: Vec<RunningServer> = Vec::new();

    if settings.api.enabled {
        let config = HttpServerConfig::new(&settings.api.host, settings.api.port);
        let server = HttpServer::new(config, Arc::new(GameApiHandler::new(ctx.clone())))
            .start()
            .await
            .context("Game data API failed to start")?;
        servers.push(server);
    }

    if settings.manager.enabled {
        let config = HttpServerConfig::new(&settings.manager.host, settings.manager.port);
        let server = HttpServer::new(config, Arc::new(ManagementHandler::new(ctx.clone())))
            .start()
            .await
            .context("Management API failed to start")?;
        servers.push(server);
    }

    if servers.is_empty() {
        anyhow::bail!("Both the game data API and the management API are disabled");
    }

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    for server in servers {
        let addr = server.local_addr();
        if let Err(e) = server.shutdown().await {
            error!(addr = %addr, error = %e, "Server did not stop cleanly");
        }
    }

    info!("Shutdown complete.");

    Ok(())
}
