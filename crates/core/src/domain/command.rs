// Command Outcome (returned verbatim to API clients)

use serde::{Deserialize, Serialize};

/// Result of one external command invocation
///
/// Serializes as `{success, stdout, stderr, returncode}` for a process that
/// ran, or `{success: false, error, returncode: -1}` when it never started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub returncode: i32,
}

impl CommandOutcome {
    /// Outcome of a process that ran to completion
    pub fn completed(returncode: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success: returncode == 0,
            stdout: Some(stdout.into()),
            stderr: Some(stderr.into()),
            error: None,
            returncode,
        }
    }

    /// Outcome of a process that could not be spawned
    pub fn failed_to_start(error: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: None,
            stderr: None,
            error: Some(error.into()),
            returncode: -1,
        }
    }

    /// Captured stdout, empty if the process never ran
    pub fn stdout(&self) -> &str {
        self.stdout.as_deref().unwrap_or_default()
    }
}
