// Fortress Infrastructure - System Adapters
// Implements: CommandRunner, HttpProbe, GameDataSource, EnvStore

pub mod env_file_store;
pub mod fs_game_data;
pub mod http_probe_impl;
pub mod process_runner;

pub use env_file_store::EnvFileStore;
pub use fs_game_data::FsGameDataSource;
pub use http_probe_impl::ReqwestHttpProbe;
pub use process_runner::ProcessCommandRunner;
