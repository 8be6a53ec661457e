// Resource Snapshotter
// `docker stats` rows and per-volume `du` sizes

use crate::application::constants::{DOCKER_STATS_FORMAT, STATS_MIN_FIELDS};
use crate::domain::resource::{DISK_USAGE_NOT_FOUND, DISK_USAGE_UNAVAILABLE};
use crate::domain::{DiskUsage, ResourceSample, ServiceCatalog};
use crate::port::{argv, CommandRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parse tab-separated `docker stats` output
///
/// Skips the header, keeps rows naming a known service, and silently drops
/// rows with fewer than five fields. Fields are copied verbatim.
pub fn parse_stats_table(text: &str, catalog: &ServiceCatalog) -> Vec<ResourceSample> {
    text.trim()
        .lines()
        .skip(1)
        .filter(|line| catalog.matches_stats(line))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < STATS_MIN_FIELDS {
                return None;
            }
            Some(ResourceSample {
                name: fields[0].to_string(),
                cpu_percent: fields[1].to_string(),
                memory: fields[2].to_string(),
                network_io: fields[3].to_string(),
                block_io: fields[4].to_string(),
            })
        })
        .collect()
}

/// First token of `du -sh` output (the size), None if there is none
pub fn parse_du_output(stdout: &str) -> Option<String> {
    stdout.split_whitespace().next().map(str::to_string)
}

/// Collects container resource usage and volume sizes
pub struct ResourceSnapshotter {
    runner: Arc<dyn CommandRunner>,
    docker_program: String,
    base_dir: PathBuf,
    volumes: Vec<String>,
    catalog: ServiceCatalog,
}

impl ResourceSnapshotter {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        docker_program: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        volumes: Vec<String>,
        catalog: ServiceCatalog,
    ) -> Self {
        Self {
            runner,
            docker_program: docker_program.into(),
            base_dir: base_dir.into(),
            volumes,
            catalog,
        }
    }

    /// One-shot `docker stats`; empty if the command fails
    pub async fn docker_stats(&self) -> Vec<ResourceSample> {
        let args = argv(["stats", "--no-stream", "--format", DOCKER_STATS_FORMAT]);
        let outcome = self.runner.run_outcome(&self.docker_program, &args).await;

        if !outcome.success {
            warn!(
                returncode = outcome.returncode,
                error = ?outcome.error,
                "docker stats failed"
            );
            return Vec::new();
        }

        parse_stats_table(outcome.stdout(), &self.catalog)
    }

    /// Size of every volume directory under the base directory
    pub async fn disk_usage(&self) -> DiskUsage {
        let mut usage = DiskUsage::new();

        for volume in &self.volumes {
            let path = self.base_dir.join(volume);
            let exists = tokio::fs::try_exists(&path).await.unwrap_or(false);

            let size = if !exists {
                DISK_USAGE_NOT_FOUND.to_string()
            } else {
                let args = vec!["-sh".to_string(), path.to_string_lossy().into_owned()];
                let outcome = self.runner.run_outcome("du", &args).await;
                if outcome.success {
                    parse_du_output(outcome.stdout())
                        .unwrap_or_else(|| DISK_USAGE_UNAVAILABLE.to_string())
                } else {
                    DISK_USAGE_UNAVAILABLE.to_string()
                }
            };

            debug!(volume = %volume, size = %size, "Volume size measured");
            usage.insert(volume.clone(), size);
        }

        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::constants::DEFAULT_VOLUMES;
    use crate::port::command_runner::mocks::MockCommandRunner;

    fn volumes() -> Vec<String> {
        DEFAULT_VOLUMES.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_stats_rows() {
        let text = "NAME\tCPU %\tMEM USAGE / LIMIT\tNET I/O\tBLOCK I/O\n\
                    dwarf-fortress-ai\t12.5%\t512MiB / 2GiB\t1.2kB / 3kB\t0B / 0B\n\
                    dashy-fortress\t0.1%\t80MiB\n\
                    redis\t1%\t10MiB / 1GiB\t0B / 0B\t0B / 0B\n";
        let samples = parse_stats_table(text, &ServiceCatalog::default());

        assert_eq!(samples.len(), 1);
        assert_eq!(
            samples[0],
            ResourceSample {
                name: "dwarf-fortress-ai".to_string(),
                cpu_percent: "12.5%".to_string(),
                memory: "512MiB / 2GiB".to_string(),
                network_io: "1.2kB / 3kB".to_string(),
                block_io: "0B / 0B".to_string(),
            }
        );
    }

    #[test]
    fn test_stats_wire_keys() {
        let sample = ResourceSample {
            name: "dashy".to_string(),
            cpu_percent: "1%".to_string(),
            memory: "1MiB".to_string(),
            network_io: "0B".to_string(),
            block_io: "0B".to_string(),
        };
        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["cpu"], "1%");
        assert_eq!(value["network"], "0B");
        assert_eq!(value["block_io"], "0B");
    }

    #[test]
    fn test_du_output() {
        assert_eq!(
            parse_du_output("4.0K\t/app/project/saves\n"),
            Some("4.0K".to_string())
        );
        assert_eq!(parse_du_output(""), None);
    }

    #[tokio::test]
    async fn test_disk_usage_markers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("saves")).unwrap();
        std::fs::create_dir(dir.path().join("logs")).unwrap();

        let saves = dir.path().join("saves");
        let runner = MockCommandRunner::new()
            .on_success(
                format!("du -sh {}", saves.display()),
                format!("12M\t{}\n", saves.display()),
            )
            .on_failure("du -sh", 1, "permission denied");

        let snapshotter = ResourceSnapshotter::new(
            Arc::new(runner),
            "docker",
            dir.path(),
            volumes(),
            ServiceCatalog::default(),
        );
        let usage = snapshotter.disk_usage().await;

        assert_eq!(usage["saves"], "12M");
        assert_eq!(usage["logs"], DISK_USAGE_UNAVAILABLE);
        assert_eq!(usage["output"], DISK_USAGE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_docker_stats_failure_is_empty() {
        let runner = MockCommandRunner::new().on_spawn_error("docker stats", "not installed");
        let snapshotter = ResourceSnapshotter::new(
            Arc::new(runner),
            "docker",
            "/nonexistent",
            volumes(),
            ServiceCatalog::default(),
        );
        assert!(snapshotter.docker_stats().await.is_empty());
    }
}
