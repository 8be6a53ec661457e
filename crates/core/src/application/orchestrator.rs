// Compose Orchestrator
// start / stop / restart / build / logs through docker-compose

use crate::application::constants::DEFAULT_LOG_LINES;
use crate::domain::CommandOutcome;
use crate::error::{AppError, Result};
use crate::port::CommandRunner;
use std::sync::Arc;
use tracing::info;

/// Lifecycle actions accepted by the management API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Start,
    Stop,
    Restart,
}

impl ComposeAction {
    fn subcommand(self) -> &'static [&'static str] {
        match self {
            ComposeAction::Start => &["up", "-d"],
            ComposeAction::Stop => &["stop"],
            ComposeAction::Restart => &["restart"],
        }
    }
}

/// Reject service names that docker-compose would read as flags
pub fn validate_service_name(service: &str) -> Result<()> {
    let valid = !service.is_empty()
        && !service.starts_with('-')
        && service
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid service name: {:?}",
            service
        )))
    }
}

pub struct ComposeOrchestrator {
    runner: Arc<dyn CommandRunner>,
    compose_program: String,
}

impl ComposeOrchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, compose_program: impl Into<String>) -> Self {
        Self {
            runner,
            compose_program: compose_program.into(),
        }
    }

    /// Run a lifecycle action for one service, or all when `service` is None
    pub async fn lifecycle(
        &self,
        action: ComposeAction,
        service: Option<&str>,
    ) -> Result<CommandOutcome> {
        let mut args: Vec<String> = action.subcommand().iter().map(|s| s.to_string()).collect();
        push_service(&mut args, service)?;
        Ok(self.invoke(args).await)
    }

    pub async fn start(&self, service: Option<&str>) -> Result<CommandOutcome> {
        self.lifecycle(ComposeAction::Start, service).await
    }

    pub async fn stop(&self, service: Option<&str>) -> Result<CommandOutcome> {
        self.lifecycle(ComposeAction::Stop, service).await
    }

    pub async fn restart(&self, service: Option<&str>) -> Result<CommandOutcome> {
        self.lifecycle(ComposeAction::Restart, service).await
    }

    pub async fn build(&self, service: Option<&str>, no_cache: bool) -> Result<CommandOutcome> {
        let mut args = vec!["build".to_string()];
        if no_cache {
            args.push("--no-cache".to_string());
        }
        push_service(&mut args, service)?;
        Ok(self.invoke(args).await)
    }

    /// Last `lines` log lines (default 100)
    pub async fn logs(&self, service: Option<&str>, lines: Option<usize>) -> Result<CommandOutcome> {
        let lines = lines.unwrap_or(DEFAULT_LOG_LINES);
        let mut args = vec!["logs".to_string(), format!("--tail={}", lines)];
        push_service(&mut args, service)?;
        Ok(self.invoke(args).await)
    }

    async fn invoke(&self, args: Vec<String>) -> CommandOutcome {
        info!(program = %self.compose_program, args = ?args, "Running compose command");
        let outcome = self.runner.run_outcome(&self.compose_program, &args).await;
        info!(
            program = %self.compose_program,
            success = outcome.success,
            returncode = outcome.returncode,
            "Compose command finished"
        );
        outcome
    }
}

fn push_service(args: &mut Vec<String>, service: Option<&str>) -> Result<()> {
    if let Some(service) = service {
        validate_service_name(service)?;
        args.push(service.to_string());
    }
    Ok(())
}
