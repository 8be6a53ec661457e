//! Fortress CLI - Command-line client for the Fortress Ops management API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tabled::{Table, Tabled};

const DEFAULT_MANAGER_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "fortress")]
#[command(about = "Dwarf Fortress container management CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Management API URL
    #[arg(long, env = "FORTRESS_MANAGER_URL", default_value = DEFAULT_MANAGER_URL)]
    manager_url: String,

    /// Game data API URL
    #[arg(long, env = "FORTRESS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show containers, health, disk usage and resource usage
    Status,

    /// List managed containers
    Containers,

    /// Start containers (docker-compose up -d)
    Start {
        /// Compose service name (default: all)
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Stop containers
    Stop {
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Restart containers
    Restart {
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Build images
    Build {
        #[arg(short, long)]
        service: Option<String>,

        /// Pass --no-cache to docker-compose build
        #[arg(long)]
        no_cache: bool,
    },

    /// Show container logs
    Logs {
        #[arg(short, long)]
        service: Option<String>,

        /// Number of lines to tail
        #[arg(short = 'n', long, default_value = "100")]
        lines: usize,
    },

    /// Read or update the .env configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show fortress statistics from the game data API
    Fortress,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print every KEY=VALUE entry
    Get,

    /// Set one or more KEY=VALUE entries
    Set {
        #[arg(required = true)]
        entries: Vec<String>,
    },
}

#[derive(Deserialize, Tabled)]
struct ContainerRow {
    name: String,
    service: String,
    image: String,
    status: String,
    ports: String,
}

#[derive(Deserialize, Tabled)]
struct StatsRow {
    name: String,
    cpu: String,
    memory: String,
    network: String,
    block_io: String,
}

#[derive(Deserialize)]
struct CommandOutcome {
    success: bool,
    stdout: Option<String>,
    stderr: Option<String>,
    error: Option<String>,
    returncode: i32,
}

struct Client {
    http: reqwest::Client,
}

impl Client {
    fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn get(&self, base: &str, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", base.trim_end_matches('/'), path);
        self.http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?
            .json()
            .await
            .context("Failed to parse response")
    }

    async fn post(&self, base: &str, path: &str, body: Value) -> Result<Value> {
        let url = format!("{}{}", base.trim_end_matches('/'), path);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        let status = response.status();
        let value: Value = response.json().await.context("Failed to parse response")?;
        if !status.is_success() {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("request failed");
            anyhow::bail!("HTTP {}: {}", status.as_u16(), message);
        }
        Ok(value)
    }
}

/// Split `KEY=VALUE` at the first `=`
fn parse_assignment(entry: &str) -> Result<(String, String)> {
    let (key, value) = entry
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got `{}`", entry))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty key in `{}`", entry);
    }
    Ok((key.to_string(), value.to_string()))
}

fn service_body(service: Option<String>) -> Value {
    match service {
        Some(service) => json!({ "service": service }),
        None => json!({}),
    }
}

fn print_outcome(action: &str, outcome: CommandOutcome) {
    if outcome.success {
        println!("{}", format!("✓ {} succeeded", action).green().bold());
    } else {
        println!(
            "{}",
            format!("✗ {} failed (exit code {})", action, outcome.returncode)
                .red()
                .bold()
        );
    }

    for text in [outcome.stdout, outcome.stderr, outcome.error]
        .into_iter()
        .flatten()
    {
        let text = text.trim_end();
        if !text.is_empty() {
            println!("{}", text);
        }
    }
}

fn containers_table(value: &Value) -> Result<String> {
    let rows: Vec<ContainerRow> = serde_json::from_value(value.clone())?;
    if rows.is_empty() {
        return Ok("No containers found".yellow().to_string());
    }
    Ok(Table::new(rows).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let manager = cli.manager_url.as_str();

    match cli.command {
        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match client.get(manager, "/api/status", &[]).await {
                Ok(status) => {
                    println!("{}", containers_table(&status["containers"])?);
                    println!();

                    println!("{}", "Health".bold());
                    if let Some(health) = status["health"].as_object() {
                        for (key, ok) in health {
                            let label = if ok.as_bool().unwrap_or(false) {
                                "UP".green()
                            } else {
                                "DOWN".red()
                            };
                            println!("  {} {}", format!("{}:", key).bold(), label);
                        }
                    }
                    println!();

                    println!("{}", "Disk Usage".bold());
                    if let Some(usage) = status["disk_usage"].as_object() {
                        for (volume, size) in usage {
                            println!(
                                "  {} {}",
                                format!("{}:", volume).bold(),
                                size.as_str().unwrap_or("N/A")
                            );
                        }
                    }
                    println!();

                    let stats: Vec<StatsRow> =
                        serde_json::from_value(status["docker_stats"].clone())?;
                    if !stats.is_empty() {
                        println!("{}", Table::new(stats));
                    }
                    println!(
                        "  {} {}",
                        "Updated:".bold(),
                        status["timestamp"].as_str().unwrap_or_default()
                    );
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Containers => {
            let containers = client.get(manager, "/api/containers", &[]).await?;
            println!("{}", containers_table(&containers)?);
        }

        Commands::Start { service } => {
            let result = client
                .post(manager, "/api/start", service_body(service))
                .await?;
            print_outcome("Start", serde_json::from_value(result)?);
        }

        Commands::Stop { service } => {
            let result = client
                .post(manager, "/api/stop", service_body(service))
                .await?;
            print_outcome("Stop", serde_json::from_value(result)?);
        }

        Commands::Restart { service } => {
            let result = client
                .post(manager, "/api/restart", service_body(service))
                .await?;
            print_outcome("Restart", serde_json::from_value(result)?);
        }

        Commands::Build { service, no_cache } => {
            println!("{}", "Building images...".cyan().bold());
            let mut body = service_body(service);
            body["no_cache"] = json!(no_cache);
            let result = client.post(manager, "/api/build", body).await?;
            print_outcome("Build", serde_json::from_value(result)?);
        }

        Commands::Logs { service, lines } => {
            let mut query = vec![("lines", lines.to_string())];
            if let Some(service) = service {
                query.push(("service", service));
            }
            let result = client.get(manager, "/api/logs", &query).await?;
            let outcome: CommandOutcome = serde_json::from_value(result)?;

            match outcome.stdout.filter(|s| !s.is_empty()) {
                Some(logs) => println!("{}", logs),
                None => println!("{}", "No logs available".yellow()),
            }
            if let Some(err) = outcome.error.or(outcome.stderr).filter(|s| !s.is_empty()) {
                eprintln!("{}", err.trim_end().red());
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Get => {
                let config = client.get(manager, "/api/config", &[]).await?;
                match config.as_object() {
                    Some(entries) if !entries.is_empty() => {
                        for (key, value) in entries {
                            println!("{}={}", key.bold(), value.as_str().unwrap_or_default());
                        }
                    }
                    _ => println!("{}", "No configuration entries".yellow()),
                }
            }
            ConfigAction::Set { entries } => {
                let mut patch = Map::new();
                for entry in &entries {
                    let (key, value) = parse_assignment(entry)?;
                    patch.insert(key, Value::String(value));
                }
                let count = patch.len();
                client
                    .post(manager, "/api/config", Value::Object(patch))
                    .await?;
                println!(
                    "{}",
                    format!("✓ Updated {} configuration entries", count)
                        .green()
                        .bold()
                );
            }
        },

        Commands::Fortress => {
            let stats = client.get(&cli.api_url, "/api/fortress-stats", &[]).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("DF_PORT=8080").unwrap(),
            ("DF_PORT".to_string(), "8080".to_string())
        );
        assert_eq!(
            parse_assignment("URL=http://x?a=b").unwrap(),
            ("URL".to_string(), "http://x?a=b".to_string())
        );
        assert!(parse_assignment("NOEQUALS").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn test_service_body() {
        assert_eq!(service_body(None), json!({}));
        assert_eq!(
            service_body(Some("dashy".to_string())),
            json!({"service": "dashy"})
        );
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["fortress", "build", "--service", "dwarf-fortress", "--no-cache"])
            .unwrap();
        match cli.command {
            Commands::Build { service, no_cache } => {
                assert_eq!(service.as_deref(), Some("dwarf-fortress"));
                assert!(no_cache);
            }
            _ => panic!("expected build"),
        }
    }
}
