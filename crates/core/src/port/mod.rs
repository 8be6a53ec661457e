// Port Layer - Interfaces for external dependencies

pub mod command_runner;
pub mod env_store;
pub mod game_data;
pub mod http_probe;
pub mod time_provider;

// Re-exports
pub use command_runner::{argv, CommandError, CommandRunner};
pub use env_store::EnvStore;
pub use game_data::GameDataSource;
pub use http_probe::{HttpProbe, ProbeError};
pub use time_provider::TimeProvider;
