// Domain Layer - Snapshot entities, no I/O

pub mod command;
pub mod env_config;
pub mod error;
pub mod game;
pub mod health;
pub mod resource;
pub mod service;

// Re-exports
pub use command::CommandOutcome;
pub use env_config::EnvEntries;
pub use error::DomainError;
pub use game::{
    FortressPlaceholder, LogTail, OutputFileEntry, SaveEntry, FORTRESS_DATA_FILE, KNOWN_LOG_FILES,
    LOG_TAIL_LINES,
};
pub use health::{HealthStatus, ProbeTarget};
pub use resource::{DiskUsage, ResourceSample};
pub use service::{HealthTag, LabelRule, ServiceCatalog, ServiceRecord, ServiceState};
