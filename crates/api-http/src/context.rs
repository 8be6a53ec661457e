//! Shared state handed to both routers

use fortress_core::application::{
    ComposeOrchestrator, ConfigService, DashboardService, GameService,
};
use fortress_core::port::TimeProvider;
use std::sync::Arc;

/// Application services built once by the daemon
pub struct AppContext {
    pub game: GameService,
    pub dashboard: DashboardService,
    pub orchestrator: ComposeOrchestrator,
    pub config: ConfigService,
    pub time_provider: Arc<dyn TimeProvider>,
}
