//! Route Handlers
//!
//! One router per HTTP surface. Both answer with [`ApiResponse`] values and
//! never fail; errors become JSON error bodies here.

use crate::context::AppContext;
use crate::error::to_http_error;
use crate::response::{ApiRequest, ApiResponse};
use crate::types::{
    BuildRequest, ConfigUpdateResponse, LogsQuery, LogsResponse, OutputFilesResponse,
    SavesResponse, ServiceRequest,
};
use async_trait::async_trait;
use fortress_core::application::ComposeAction;
use fortress_core::error::AppError;
use hyper::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Maps a request to a response for one HTTP surface
#[async_trait]
pub trait Router: Send + Sync {
    /// Surface name used in logs
    fn name(&self) -> &'static str;

    async fn route(&self, req: &ApiRequest) -> ApiResponse;
}

/// Game data API (fortress export, saves, logs, output files)
pub struct GameApiHandler {
    ctx: Arc<AppContext>,
}

impl GameApiHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    async fn saves(&self) -> ApiResponse {
        match self.ctx.game.saves().await {
            Ok(saves) => ApiResponse::json(&SavesResponse {
                count: saves.len(),
                saves,
            }),
            Err(e) => to_http_error(e),
        }
    }

    async fn logs(&self) -> ApiResponse {
        match self.ctx.game.logs().await {
            Ok(logs) => ApiResponse::json(&LogsResponse {
                logs,
                timestamp: self.ctx.time_provider.now_iso(),
            }),
            Err(e) => to_http_error(e),
        }
    }

    async fn output_files(&self) -> ApiResponse {
        match self.ctx.game.output_files().await {
            Ok(files) => ApiResponse::json(&OutputFilesResponse {
                count: files.len(),
                files,
            }),
            Err(e) => to_http_error(e),
        }
    }
}

#[async_trait]
impl Router for GameApiHandler {
    fn name(&self) -> &'static str {
        "game-api"
    }

    async fn route(&self, req: &ApiRequest) -> ApiResponse {
        let game = &self.ctx.game;
        match (&req.method, req.path.as_str()) {
            (&Method::GET, "/api/health") => ApiResponse::json(&game.health()),
            (&Method::GET, "/api/fortress-stats") => ApiResponse::json(&game.fortress_stats().await),
            (&Method::GET, "/api/fortress-stats/population") => {
                ApiResponse::json(&game.population().await)
            }
            (&Method::GET, "/api/fortress-stats/wealth") => ApiResponse::json(&game.wealth().await),
            (&Method::GET, "/api/saves") => self.saves().await,
            (&Method::GET, "/api/logs") => self.logs().await,
            (&Method::GET, "/api/output-files") => self.output_files().await,
            (&Method::POST, "/api/export-data") => ApiResponse::json(&game.export_data()),
            (&Method::GET, "/api/system-info") => ApiResponse::json(&game.system_info().await),
            (&Method::GET, "/api/steam-status") => ApiResponse::json(&game.steam_status().await),
            _ => ApiResponse::not_found(),
        }
    }
}

/// Management API (docker status, compose lifecycle, .env config)
pub struct ManagementHandler {
    ctx: Arc<AppContext>,
}

impl ManagementHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    async fn lifecycle(&self, action: ComposeAction, req: &ApiRequest) -> ApiResponse {
        let body = match ServiceRequest::from_body(req.json_body().as_ref()) {
            Ok(body) => body,
            Err(e) => return to_http_error(e),
        };
        match self
            .ctx
            .orchestrator
            .lifecycle(action, body.service.as_deref())
            .await
        {
            Ok(outcome) => ApiResponse::json(&outcome),
            Err(e) => to_http_error(e),
        }
    }

    async fn build(&self, req: &ApiRequest) -> ApiResponse {
        let body = match BuildRequest::from_body(req.json_body().as_ref()) {
            Ok(body) => body,
            Err(e) => return to_http_error(e),
        };
        match self
            .ctx
            .orchestrator
            .build(body.service.as_deref(), body.no_cache)
            .await
        {
            Ok(outcome) => ApiResponse::json(&outcome),
            Err(e) => to_http_error(e),
        }
    }

    async fn compose_logs(&self, req: &ApiRequest) -> ApiResponse {
        let query = LogsQuery::parse(req.query.as_deref());
        match self
            .ctx
            .orchestrator
            .logs(query.service.as_deref(), query.lines)
            .await
        {
            Ok(outcome) => ApiResponse::json(&outcome),
            Err(e) => to_http_error(e),
        }
    }

    async fn fortress_stats(&self) -> ApiResponse {
        match self.ctx.dashboard.fortress_stats().await {
            Ok(stats) => ApiResponse::json(&stats),
            Err(e) => {
                warn!(error = %e, "Fortress API not available");
                ApiResponse::json(&json!({ "error": "Fortress API not available" }))
            }
        }
    }

    async fn read_config(&self) -> ApiResponse {
        match self.ctx.config.load().await {
            Ok(entries) => ApiResponse::json(&entries.to_json()),
            Err(e) => to_http_error(e),
        }
    }

    async fn update_config(&self, req: &ApiRequest) -> ApiResponse {
        let Some(patch) = req.json_body() else {
            return ApiResponse::json(&ConfigUpdateResponse::rejected(
                "Request body must be a JSON object",
            ))
            .with_status(StatusCode::BAD_REQUEST);
        };

        match self.ctx.config.update(&patch).await {
            Ok(_) => ApiResponse::json(&ConfigUpdateResponse::updated()),
            Err(e) => {
                let status = match e {
                    AppError::Validation(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                ApiResponse::json(&ConfigUpdateResponse::rejected(e.to_string()))
                    .with_status(status)
            }
        }
    }
}

#[async_trait]
impl Router for ManagementHandler {
    fn name(&self) -> &'static str {
        "manager"
    }

    async fn route(&self, req: &ApiRequest) -> ApiResponse {
        let dashboard = &self.ctx.dashboard;
        match (&req.method, req.path.as_str()) {
            (&Method::GET, "/api/status") => ApiResponse::json(&dashboard.report().await),
            (&Method::GET, "/api/containers") => ApiResponse::json(&dashboard.containers().await),
            (&Method::GET, "/api/stats") => ApiResponse::json(&dashboard.docker_stats().await),
            (&Method::GET, "/api/disk-usage") => ApiResponse::json(&dashboard.disk_usage().await),
            (&Method::GET, "/api/health") => ApiResponse::json(&dashboard.health().await),
            (&Method::POST, "/api/start") => self.lifecycle(ComposeAction::Start, req).await,
            (&Method::POST, "/api/stop") => self.lifecycle(ComposeAction::Stop, req).await,
            (&Method::POST, "/api/restart") => self.lifecycle(ComposeAction::Restart, req).await,
            (&Method::POST, "/api/build") => self.build(req).await,
            (&Method::GET, "/api/logs") => self.compose_logs(req).await,
            (&Method::GET, "/api/fortress-stats") => self.fortress_stats().await,
            (&Method::GET, "/api/config") => self.read_config().await,
            (&Method::POST, "/api/config") => self.update_config(req).await,
            _ => ApiResponse::not_found(),
        }
    }
}
