// Process command runner
// reason: tokio::process for async docker invocations
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

use fortress_core::domain::CommandOutcome;
use fortress_core::port::{CommandError, CommandRunner, TimeProvider};

/// Runs programs with an argv vector (never through a shell)
///
/// Every command runs in `working_dir`, the compose project directory.
pub struct ProcessCommandRunner {
    time_provider: Arc<dyn TimeProvider>,
    working_dir: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessCommandRunner {
    /// Create a new runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `working_dir` - Directory holding `docker-compose.yml`
    ///
    /// # Example
    /// ```ignore
    /// let runner = ProcessCommandRunner::new(Arc::new(SystemTimeProvider), "/app/project");
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            time_provider,
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    /// Kill commands that run longer than `limit` (no limit by default)
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<std::process::Output, CommandError> {
        let child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CommandError::SpawnFailed(e.to_string()))?;

        match self.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(e)) => Err(CommandError::IoError(e.to_string())),
                Err(_) => Err(CommandError::IoError(format!(
                    "timed out after {}ms",
                    limit.as_millis()
                ))),
            },
            None => child
                .wait_with_output()
                .await
                .map_err(|e| CommandError::IoError(e.to_string())),
        }
    }

    /// Build outcome from process output
    fn build_outcome(output: std::process::Output) -> CommandOutcome {
        // Killed by a signal: no exit code
        let returncode = output.status.code().unwrap_or(-1);
        CommandOutcome::completed(
            returncode,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        )
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutcome, CommandError> {
        let start_time = self.time_provider.now_millis();

        info!(
            program = %program,
            args = ?args,
            working_dir = %self.working_dir.display(),
            "Starting command"
        );

        let output = match self.spawn_and_wait(program, args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(program = %program, error = %e, "Command could not run");
                return Err(e);
            }
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        let outcome = Self::build_outcome(output);

        info!(
            program = %program,
            duration_ms = %duration_ms,
            returncode = outcome.returncode,
            success = outcome.success,
            "Command completed"
        );

        Ok(outcome)
    }
}
