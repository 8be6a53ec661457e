// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed listing line: {0}")]
    MalformedLine(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
