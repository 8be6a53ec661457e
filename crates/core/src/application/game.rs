// Game Data Service
// Fortress statistics with fallbacks, save/log/output listings, host info

use crate::application::constants::EXPORT_SCRIPT_HINT;
use crate::domain::game::{
    default_population, default_wealth, sample_fortress_data, KNOWN_LOG_FILES, LOG_TAIL_LINES,
};
use crate::domain::{FortressPlaceholder, LogTail, OutputFileEntry, SaveEntry};
use crate::error::Result;
use crate::port::{argv, CommandRunner, GameDataSource, TimeProvider};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Payload of the game API health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Acknowledgement of the export trigger
#[derive(Debug, Clone, Serialize)]
pub struct ExportAck {
    pub message: String,
    pub timestamp: String,
    pub note: String,
}

/// Raw `uname -a` / `free -h` text
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub system: String,
    pub memory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SteamStatus {
    pub steam_available: bool,
    pub steam_path: Option<String>,
    pub message: String,
    pub timestamp: String,
}

/// Identity reported by the game API
#[derive(Debug, Clone)]
pub struct GameIdentity {
    pub service_label: String,
    pub version: String,
    /// Optional platform tag (e.g. "ARM") included in health/system payloads
    pub platform: Option<String>,
}

impl Default for GameIdentity {
    fn default() -> Self {
        Self {
            service_label: "dwarf-fortress-api".to_string(),
            version: "1.0.0".to_string(),
            platform: None,
        }
    }
}

/// JSON truthiness: null, false, 0, "", [] and {} count as "no data"
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub struct GameService {
    data: Arc<dyn GameDataSource>,
    runner: Arc<dyn CommandRunner>,
    time_provider: Arc<dyn TimeProvider>,
    placeholder: FortressPlaceholder,
    identity: GameIdentity,
}

impl GameService {
    pub fn new(
        data: Arc<dyn GameDataSource>,
        runner: Arc<dyn CommandRunner>,
        time_provider: Arc<dyn TimeProvider>,
        placeholder: FortressPlaceholder,
        identity: GameIdentity,
    ) -> Self {
        Self {
            data,
            runner,
            time_provider,
            placeholder,
            identity,
        }
    }

    pub fn health(&self) -> ServiceHealth {
        ServiceHealth {
            status: "running".to_string(),
            service: self.identity.service_label.clone(),
            timestamp: self.time_provider.now_iso(),
            version: self.identity.version.clone(),
            platform: self.identity.platform.clone(),
        }
    }

    async fn fortress_data(&self) -> Option<Value> {
        self.data.read_fortress_data().await.filter(is_present)
    }

    /// Exported fortress data, or the placeholder object
    ///
    /// Missing and malformed exports are both "no data yet".
    pub async fn fortress_stats(&self) -> Value {
        if let Err(e) = self.data.ensure_output_dir().await {
            warn!(error = %e, "Could not create output directory");
        }

        match self.fortress_data().await {
            Some(data) => data,
            None => self.placeholder.stats(&self.time_provider.now_iso()),
        }
    }

    pub async fn population(&self) -> Value {
        self.section("population").await.unwrap_or_else(default_population)
    }

    pub async fn wealth(&self) -> Value {
        self.section("wealth").await.unwrap_or_else(default_wealth)
    }

    async fn section(&self, key: &str) -> Option<Value> {
        self.fortress_data().await?.get(key).cloned()
    }

    /// Save directories, newest first
    pub async fn saves(&self) -> Result<Vec<SaveEntry>> {
        let mut saves = self.data.list_saves().await?;
        saves.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(saves)
    }

    /// Output files, newest first
    pub async fn output_files(&self) -> Result<Vec<OutputFileEntry>> {
        let mut files = self.data.list_output_files().await?;
        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Tail of every known log file that exists
    pub async fn logs(&self) -> Result<Vec<LogTail>> {
        let logs = self.data.read_logs(&KNOWN_LOG_FILES).await?;
        Ok(logs
            .into_iter()
            .map(|(name, content)| LogTail::from_content(name, &content, LOG_TAIL_LINES))
            .collect())
    }

    pub fn export_data(&self) -> ExportAck {
        ExportAck {
            message: "Data export triggered".to_string(),
            timestamp: self.time_provider.now_iso(),
            note: EXPORT_SCRIPT_HINT.to_string(),
        }
    }

    pub async fn system_info(&self) -> SystemInfo {
        let system = self.command_text("uname", &["-a"]).await;
        let memory = self.command_text("free", &["-h"]).await;

        SystemInfo {
            system,
            memory,
            platform: self.identity.platform.clone(),
            timestamp: self.time_provider.now_iso(),
        }
    }

    pub async fn steam_status(&self) -> SteamStatus {
        let outcome = self.runner.run_outcome("which", &argv(["steam"])).await;
        let steam_path = outcome
            .success
            .then(|| outcome.stdout().trim().to_string());

        SteamStatus {
            steam_available: outcome.success,
            message: if outcome.success {
                "Steam/Proton integration ready".to_string()
            } else {
                "Steam not found - install Steam for Dwarf Fortress".to_string()
            },
            steam_path,
            timestamp: self.time_provider.now_iso(),
        }
    }

    /// Write the sample export used before the game produces real data
    pub async fn seed_sample_data(&self) -> Result<()> {
        self.data.ensure_output_dir().await?;
        let sample = sample_fortress_data(&self.time_provider.now_iso());
        self.data.write_fortress_data(&sample).await?;
        info!("Sample fortress data written");
        Ok(())
    }

    async fn command_text(&self, program: &str, args: &[&str]) -> String {
        let outcome = self.runner.run_outcome(program, &argv(args)).await;
        if outcome.success {
            outcome.stdout().trim().to_string()
        } else {
            "Unknown".to_string()
        }
    }
}
