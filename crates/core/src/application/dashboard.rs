// Dashboard Service
// Aggregated status: collect -> probe -> snapshot, strictly sequential

use crate::application::health::HealthProber;
use crate::application::resources::ResourceSnapshotter;
use crate::application::status::StatusCollector;
use crate::domain::{DiskUsage, HealthStatus, ResourceSample, ServiceRecord};
use crate::error::Result;
use crate::port::{HttpProbe, TimeProvider};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Response of the aggregated status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub containers: Vec<ServiceRecord>,
    pub health: HealthStatus,
    pub disk_usage: DiskUsage,
    pub docker_stats: Vec<ResourceSample>,
    pub timestamp: String,
}

pub struct DashboardService {
    collector: StatusCollector,
    prober: HealthProber,
    snapshotter: ResourceSnapshotter,
    http: Arc<dyn HttpProbe>,
    time_provider: Arc<dyn TimeProvider>,
    fortress_stats_url: String,
}

impl DashboardService {
    pub fn new(
        collector: StatusCollector,
        prober: HealthProber,
        snapshotter: ResourceSnapshotter,
        http: Arc<dyn HttpProbe>,
        time_provider: Arc<dyn TimeProvider>,
        fortress_stats_url: impl Into<String>,
    ) -> Self {
        Self {
            collector,
            prober,
            snapshotter,
            http,
            time_provider,
            fortress_stats_url: fortress_stats_url.into(),
        }
    }

    pub async fn report(&self) -> StatusReport {
        let containers = self.collector.collect().await;
        let health = self.prober.probe_all().await;
        let disk_usage = self.snapshotter.disk_usage().await;
        let docker_stats = self.snapshotter.docker_stats().await;

        debug!(
            containers = containers.len(),
            samples = docker_stats.len(),
            "Status report assembled"
        );

        StatusReport {
            containers,
            health,
            disk_usage,
            docker_stats,
            timestamp: self.time_provider.now_iso(),
        }
    }

    pub async fn containers(&self) -> Vec<ServiceRecord> {
        self.collector.collect().await
    }

    pub async fn health(&self) -> HealthStatus {
        self.prober.probe_all().await
    }

    pub async fn docker_stats(&self) -> Vec<ResourceSample> {
        self.snapshotter.docker_stats().await
    }

    pub async fn disk_usage(&self) -> DiskUsage {
        self.snapshotter.disk_usage().await
    }

    /// Fortress statistics fetched from the game data API
    pub async fn fortress_stats(&self) -> Result<Value> {
        Ok(self.http.fetch_json(&self.fortress_stats_url).await?)
    }
}
