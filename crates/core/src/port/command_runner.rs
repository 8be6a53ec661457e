// Command Runner Port
// Abstraction over blocking external commands (docker, docker-compose, du, ...)

use crate::domain::CommandOutcome;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised before a command produced an exit status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Runner trait
///
/// Implementations:
/// - ProcessCommandRunner (infra-system): spawns the program with an argv vector
/// - MockCommandRunner: scripted outputs for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program args...` to completion and capture its output
    ///
    /// # Errors
    /// - CommandError::SpawnFailed if the program cannot be started
    ///
    /// A non-zero exit is NOT an error; it is reported in the outcome.
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutcome, CommandError>;

    /// Like `run`, but folds spawn failures into the outcome
    async fn run_outcome(&self, program: &str, args: &[String]) -> CommandOutcome {
        match self.run(program, args).await {
            Ok(outcome) => outcome,
            Err(e) => CommandOutcome::failed_to_start(e.to_string()),
        }
    }
}

/// Build an argv vector from string slices
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts.into_iter().map(|s| s.as_ref().to_string()).collect()
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Scripted reply for commands whose command line starts with `prefix`
    #[derive(Debug, Clone)]
    struct Rule {
        prefix: String,
        reply: Result<CommandOutcome, CommandError>,
    }

    /// Mock CommandRunner for testing
    ///
    /// Replies are matched by command-line prefix (`"docker ps"`), longest
    /// prefix first. Unmatched commands fail to spawn.
    #[derive(Clone, Default)]
    pub struct MockCommandRunner {
        rules: Arc<Mutex<Vec<Rule>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reply with exit code 0 and the given stdout
        pub fn on_success(self, prefix: impl Into<String>, stdout: impl Into<String>) -> Self {
            self.on(prefix, Ok(CommandOutcome::completed(0, stdout, "")))
        }

        /// Reply with a non-zero exit code and stderr
        pub fn on_failure(
            self,
            prefix: impl Into<String>,
            returncode: i32,
            stderr: impl Into<String>,
        ) -> Self {
            self.on(prefix, Ok(CommandOutcome::completed(returncode, "", stderr)))
        }

        /// Fail to spawn
        pub fn on_spawn_error(self, prefix: impl Into<String>, message: impl Into<String>) -> Self {
            self.on(prefix, Err(CommandError::SpawnFailed(message.into())))
        }

        fn on(self, prefix: impl Into<String>, reply: Result<CommandOutcome, CommandError>) -> Self {
            {
                let mut rules = self.rules.lock().unwrap();
                rules.push(Rule {
                    prefix: prefix.into(),
                    reply,
                });
                rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
            }
            self
        }

        /// Command lines seen so far, in call order
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(
            &self,
            program: &str,
            args: &[String],
        ) -> Result<CommandOutcome, CommandError> {
            let line = std::iter::once(program.to_string())
                .chain(args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ");
            self.calls.lock().unwrap().push(line.clone());

            let rules = self.rules.lock().unwrap();
            rules
                .iter()
                .find(|rule| line.starts_with(&rule.prefix))
                .map(|rule| rule.reply.clone())
                .unwrap_or_else(|| {
                    Err(CommandError::SpawnFailed(format!(
                        "no scripted reply for `{}`",
                        line
                    )))
                })
        }
    }
}
