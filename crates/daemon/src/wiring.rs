//! Composition root: settings to application services

use crate::settings::Settings;
use fortress_api_http::AppContext;
use fortress_core::application::constants::DEFAULT_VOLUMES;
use fortress_core::application::{
    ComposeOrchestrator, ConfigService, DashboardService, GameIdentity, GameService,
    HealthProber, ResourceSnapshotter, StatusCollector,
};
use fortress_core::domain::{FortressPlaceholder, ProbeTarget, ServiceCatalog};
use fortress_core::port::{CommandRunner, EnvStore, GameDataSource, HttpProbe, TimeProvider};
use std::sync::Arc;

/// Probe targets with the configured URLs
pub fn probe_targets(settings: &Settings) -> Vec<ProbeTarget> {
    ProbeTarget::defaults()
        .into_iter()
        .map(|mut target| {
            match target.key.as_str() {
                "api" => target.url = settings.probes.api_url.clone(),
                "dashy" => target.url = settings.probes.dashy_url.clone(),
                _ => {}
            }
            target
        })
        .collect()
}

pub fn build_context(
    settings: &Settings,
    runner: Arc<dyn CommandRunner>,
    http: Arc<dyn HttpProbe>,
    game_data: Arc<dyn GameDataSource>,
    env_store: Arc<dyn EnvStore>,
    time_provider: Arc<dyn TimeProvider>,
) -> AppContext {
    let catalog = ServiceCatalog::default();

    let placeholder = FortressPlaceholder {
        name: settings.game.placeholder_name.clone(),
        ..FortressPlaceholder::default()
    };
    let identity = GameIdentity {
        service_label: settings.game.service_label.clone(),
        version: settings.game.version.clone(),
        platform: settings.game.platform.clone(),
    };

    let dashboard = DashboardService::new(
        StatusCollector::new(runner.clone(), &settings.docker_program, catalog.clone()),
        HealthProber::new(
            http.clone(),
            runner.clone(),
            &settings.docker_program,
            probe_targets(settings),
        ),
        ResourceSnapshotter::new(
            runner.clone(),
            &settings.docker_program,
            &settings.base_dir,
            DEFAULT_VOLUMES.iter().map(|v| v.to_string()).collect(),
            catalog,
        ),
        http,
        time_provider.clone(),
        &settings.probes.fortress_stats_url,
    );

    AppContext {
        game: GameService::new(
            game_data,
            runner.clone(),
            time_provider.clone(),
            placeholder,
            identity,
        ),
        dashboard,
        orchestrator: ComposeOrchestrator::new(runner, &settings.compose_program),
        config: ConfigService::new(env_store, time_provider.clone()),
        time_provider,
    }
}
