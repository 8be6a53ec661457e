//! Daemon settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! file, then `FORTRESS_*` environment variables (`__` between sections,
//! e.g. `FORTRESS_MANAGER__PORT=3100`).

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Container project directory used when it holds a compose file
const CONTAINER_BASE_DIR: &str = "/app/project";
const COMPOSE_FILE: &str = "docker-compose.yml";
const DEFAULT_CONFIG_FILE: &str = "fortress.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameSettings {
    pub output_dir: PathBuf,
    pub saves_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub placeholder_name: String,
    pub service_label: String,
    pub version: String,
    /// Extra `platform` label on health and system info (e.g. "ARM Compatible")
    pub platform: Option<String>,
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSettings {
    pub api_url: String,
    pub dashy_url: String,
    pub fortress_stats_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory with `docker-compose.yml` and `.env`
    pub base_dir: PathBuf,
    pub compose_program: String,
    pub docker_program: String,
    pub api: ServerSettings,
    pub manager: ServerSettings,
    pub game: GameSettings,
    pub probes: ProbeSettings,
}

impl Settings {
    /// Load from `FORTRESS_CONFIG` (default `fortress.toml`) and the environment
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FORTRESS_CONFIG")
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::build(&config_path, fortress_environment())
    }

    /// Assemble settings from an explicit file path and environment source
    pub fn build(config_path: &Path, environment: Environment) -> Result<Self> {
        let base_dir = default_base_dir();

        let settings: Settings = Config::builder()
            .set_default("base_dir", base_dir.to_string_lossy().into_owned())?
            .set_default("compose_program", "docker-compose")?
            .set_default("docker_program", "docker")?
            .set_default("api.enabled", true)?
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8080_i64)?
            .set_default("manager.enabled", true)?
            .set_default("manager.host", "0.0.0.0")?
            .set_default("manager.port", 3000_i64)?
            .set_default("game.output_dir", "/opt/dwarf-fortress/output")?
            .set_default("game.saves_dir", "/opt/dwarf-fortress/df/data/save")?
            .set_default("game.logs_dir", "/opt/dwarf-fortress/df")?
            .set_default("game.placeholder_name", "Unknown")?
            .set_default("game.service_label", "dwarf-fortress-api")?
            .set_default("game.version", "1.0.0")?
            .set_default("game.seed_sample_data", true)?
            .set_default("probes.api_url", "http://localhost:8080/api/health")?
            .set_default("probes.dashy_url", "http://localhost:4000/")?
            .set_default(
                "probes.fortress_stats_url",
                "http://localhost:8080/api/fortress-stats",
            )?
            .add_source(File::from(config_path).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to read configuration {}", config_path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(settings.expanded())
    }

    pub fn env_file(&self) -> PathBuf {
        self.base_dir.join(".env")
    }

    /// Expand `~` in every path
    fn expanded(mut self) -> Self {
        self.base_dir = expand(&self.base_dir);
        self.game.output_dir = expand(&self.game.output_dir);
        self.game.saves_dir = expand(&self.game.saves_dir);
        self.game.logs_dir = expand(&self.game.logs_dir);
        self
    }
}

fn fortress_environment() -> Environment {
    Environment::with_prefix("FORTRESS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// `/app/project` inside the management container, else the working directory
fn default_base_dir() -> PathBuf {
    let container_dir = Path::new(CONTAINER_BASE_DIR);
    if container_dir.join(COMPOSE_FILE).exists() {
        return container_dir.to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
