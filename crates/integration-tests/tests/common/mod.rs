//! Shared fixtures: both HTTP surfaces on ephemeral ports

#![allow(dead_code)]

use fortress_api_http::{
    AppContext, GameApiHandler, HttpServer, HttpServerConfig, ManagementHandler, RunningServer,
};
use fortress_core::application::constants::DEFAULT_VOLUMES;
use fortress_core::application::{
    ComposeOrchestrator, ConfigService, DashboardService, GameIdentity, GameService,
    HealthProber, ResourceSnapshotter, StatusCollector,
};
use fortress_core::domain::{FortressPlaceholder, ProbeTarget, ServiceCatalog};
use fortress_core::port::command_runner::mocks::MockCommandRunner;
use fortress_core::port::time_provider::FixedTimeProvider;
use fortress_core::port::{CommandRunner, HttpProbe, TimeProvider};
use fortress_infra_system::{EnvFileStore, FsGameDataSource, ReqwestHttpProbe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const NOW: &str = "2024-05-01T12:00:00.000000";

/// A project directory plus both servers wired to it
pub struct TestStack {
    pub root: TempDir,
    pub runner: MockCommandRunner,
    pub game: RunningServer,
    pub manager: RunningServer,
    pub client: reqwest::Client,
}

impl TestStack {
    /// Start both servers; the management API proxies fortress stats to the game API
    pub async fn start(runner: MockCommandRunner) -> Self {
        Self::start_with(runner, "Unknown").await
    }

    pub async fn start_with(runner: MockCommandRunner, placeholder_name: &str) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let game_ctx = context(root.path(), &runner, placeholder_name, None);
        let game = HttpServer::new(
            HttpServerConfig::new("127.0.0.1", 0),
            Arc::new(GameApiHandler::new(game_ctx)),
        )
        .start()
        .await
        .expect("game api starts");

        let stats_url = format!("http://{}/api/fortress-stats", game.local_addr());
        let manager_ctx = context(root.path(), &runner, placeholder_name, Some(stats_url));
        let manager = HttpServer::new(
            HttpServerConfig::new("127.0.0.1", 0),
            Arc::new(ManagementHandler::new(manager_ctx)),
        )
        .start()
        .await
        .expect("management api starts");

        Self {
            root,
            runner,
            game,
            manager,
            client: reqwest::Client::new(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn game_url(&self, path: &str) -> String {
        format!("http://{}{}", self.game.local_addr(), path)
    }

    pub fn manager_url(&self, path: &str) -> String {
        format!("http://{}{}", self.manager.local_addr(), path)
    }

    pub async fn get_json(&self, url: &str) -> (u16, serde_json::Value) {
        let response = self.client.get(url).send().await.expect("request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    pub async fn post_raw(&self, url: &str, body: &str) -> (u16, serde_json::Value) {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    pub async fn stop(self) {
        self.game.shutdown().await.expect("game api stops");
        self.manager.shutdown().await.expect("management api stops");
    }
}

fn context(
    root: &Path,
    runner: &MockCommandRunner,
    placeholder_name: &str,
    fortress_stats_url: Option<String>,
) -> Arc<AppContext> {
    let runner: Arc<dyn CommandRunner> = Arc::new(runner.clone());
    let time: Arc<dyn TimeProvider> = Arc::new(FixedTimeProvider::new(NOW));
    let http: Arc<dyn HttpProbe> = Arc::new(ReqwestHttpProbe::new().expect("http client"));
    let catalog = ServiceCatalog::default();

    // Nothing listens on port 9; probes fall back to the process listing
    let targets = ProbeTarget::defaults()
        .into_iter()
        .map(|mut t| {
            t.url = format!("http://127.0.0.1:9/{}", t.key);
            t
        })
        .collect();

    let placeholder = FortressPlaceholder {
        name: placeholder_name.to_string(),
        ..FortressPlaceholder::default()
    };

    Arc::new(AppContext {
        game: GameService::new(
            Arc::new(FsGameDataSource::new(
                root.join("output"),
                root.join("saves"),
                root.join("logs"),
            )),
            runner.clone(),
            time.clone(),
            placeholder,
            GameIdentity::default(),
        ),
        dashboard: DashboardService::new(
            StatusCollector::new(runner.clone(), "docker", catalog.clone()),
            HealthProber::new(http.clone(), runner.clone(), "docker", targets),
            ResourceSnapshotter::new(
                runner.clone(),
                "docker",
                root,
                DEFAULT_VOLUMES.iter().map(|v| v.to_string()).collect(),
                catalog,
            ),
            http,
            time.clone(),
            fortress_stats_url.unwrap_or_else(|| "http://127.0.0.1:9/".to_string()),
        ),
        orchestrator: ComposeOrchestrator::new(runner, "docker-compose"),
        config: ConfigService::new(Arc::new(EnvFileStore::new(root.join(".env"))), time.clone()),
        time_provider: time,
    })
}
