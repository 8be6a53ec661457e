// Health Prober
// HTTP reachability first, one process-listing fallback per failed probe

use crate::application::constants::DOCKER_PS_HEALTH_FORMAT;
use crate::domain::{HealthStatus, ProbeTarget};
use crate::port::{argv, CommandRunner, HttpProbe};
use std::sync::Arc;
use tracing::{debug, info};

pub struct HealthProber {
    http: Arc<dyn HttpProbe>,
    runner: Arc<dyn CommandRunner>,
    docker_program: String,
    targets: Vec<ProbeTarget>,
}

impl HealthProber {
    pub fn new(
        http: Arc<dyn HttpProbe>,
        runner: Arc<dyn CommandRunner>,
        docker_program: impl Into<String>,
        targets: Vec<ProbeTarget>,
    ) -> Self {
        Self {
            http,
            runner,
            docker_program: docker_program.into(),
            targets,
        }
    }

    /// Probe every target once, then re-check the failed ones via `docker ps`
    ///
    /// A failed fallback command leaves the target unhealthy. No retries.
    pub async fn probe_all(&self) -> HealthStatus {
        let mut status = HealthStatus::new();

        for target in &self.targets {
            let reachable = self.http.is_reachable(&target.url).await;
            debug!(key = %target.key, url = %target.url, reachable, "HTTP probe");
            status.insert(target.key.clone(), reachable);
        }

        for target in &self.targets {
            if status.get(&target.key).copied().unwrap_or(false) {
                continue;
            }
            if let Some(healthy) = self.fallback(target).await {
                info!(key = %target.key, healthy, "Health decided by container listing");
                status.insert(target.key.clone(), healthy);
            }
        }

        status
    }

    async fn fallback(&self, target: &ProbeTarget) -> Option<bool> {
        let filter = format!("name={}", target.container_filter);
        let args = argv(["ps", "--format", DOCKER_PS_HEALTH_FORMAT, "--filter", filter.as_str()]);
        let outcome = self.runner.run_outcome(&self.docker_program, &args).await;

        outcome.success.then(|| target.accepts(outcome.stdout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::command_runner::mocks::MockCommandRunner;
    use crate::port::http_probe::mocks::MockHttpProbe;

    fn prober(http: MockHttpProbe, runner: MockCommandRunner) -> HealthProber {
        HealthProber::new(
            Arc::new(http),
            Arc::new(runner),
            "docker",
            ProbeTarget::defaults(),
        )
    }

    #[tokio::test]
    async fn test_all_reachable_skips_fallback() {
        let http = MockHttpProbe::new()
            .with_reachable("http://localhost:8080/api/health", true)
            .with_reachable("http://localhost:4000/", true);
        let runner = MockCommandRunner::new();

        let status = prober(http, runner.clone()).probe_all().await;

        assert_eq!(status["api"], true);
        assert_eq!(status["dashy"], true);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_only_for_failed_probe() {
        let http = MockHttpProbe::new()
            .with_reachable("http://localhost:8080/api/health", true)
            .with_reachable("http://localhost:4000/", false);
        let runner = MockCommandRunner::new().on_success(
            "docker ps --format",
            "NAMES\tSTATUS\ndashy-fortress\tUp 10 minutes\n",
        );

        let status = prober(http, runner.clone()).probe_all().await;

        assert_eq!(status["api"], true);
        assert_eq!(status["dashy"], true);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with("--filter name=dashy"));
    }

    #[tokio::test]
    async fn test_api_fallback_requires_healthy() {
        let http = MockHttpProbe::new();
        let runner = MockCommandRunner::new()
            .on_success(
                "docker ps --format table {{.Names}}\t{{.Status}} --filter name=dwarf-fortress",
                "NAMES\tSTATUS\ndwarf-fortress-ai\tUp 1 minute\n",
            )
            .on_failure("docker ps --format table {{.Names}}\t{{.Status}} --filter name=dashy", 1, "");

        let status = prober(http, runner).probe_all().await;

        // "up" is not enough for the api probe
        assert_eq!(status["api"], false);
        // failed fallback command keeps the probe result
        assert_eq!(status["dashy"], false);
    }
}
