// Application Layer - Use Cases

pub mod config_service;
pub mod constants;
pub mod dashboard;
pub mod game;
pub mod health;
pub mod orchestrator;
pub mod resources;
pub mod status;

// Re-exports
pub use config_service::ConfigService;
pub use dashboard::{DashboardService, StatusReport};
pub use game::{GameIdentity, GameService};
pub use health::HealthProber;
pub use orchestrator::{ComposeAction, ComposeOrchestrator};
pub use resources::ResourceSnapshotter;
pub use status::StatusCollector;
