// Status Collector
// Turns `docker ps` table text into ServiceRecords

use crate::application::constants::{DOCKER_PS_FORMAT, PS_MIN_COLUMNS};
use crate::domain::error::{DomainError, Result};
use crate::domain::{HealthTag, ServiceCatalog, ServiceRecord, ServiceState};
use crate::port::{argv, CommandRunner};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

static COLUMN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("column gap pattern is valid"));

/// Parse the full `docker ps` table
///
/// The first line is the header. Lines not naming a known container are
/// dropped; a line that fails to parse degrades to a minimal record instead
/// of aborting the batch. Input order is preserved.
pub fn parse_container_table(text: &str, catalog: &ServiceCatalog) -> Vec<ServiceRecord> {
    text.trim()
        .lines()
        .skip(1)
        .filter(|line| catalog.matches_container(line))
        .filter_map(|line| match parse_container_line(line, catalog) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, line = %line, "Degrading unparseable status line");
                degrade_line(line)
            }
        })
        .collect()
}

/// Parse one data line of the table
///
/// With at least three columns: `name`, `image`, `status`, optional `ports`.
/// Otherwise only the first whitespace token is used as the name.
pub fn parse_container_line(line: &str, catalog: &ServiceCatalog) -> Result<ServiceRecord> {
    let columns: Vec<&str> = COLUMN_GAP.split(line.trim()).map(str::trim).collect();

    if columns.len() < PS_MIN_COLUMNS {
        return parse_short_line(line, catalog);
    }

    let name = columns[0];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(DomainError::MalformedLine(format!(
            "name column `{}` is not a single token",
            name
        )));
    }
    let image = columns[1];
    let status = columns[2];
    let ports = columns.get(3).copied().unwrap_or_default();

    let state = if status.contains("Up") {
        ServiceState::Up
    } else if status.contains("Exited") {
        ServiceState::Exited
    } else {
        ServiceState::Unknown
    };
    let health = HealthTag::classify(status, state == ServiceState::Up);

    Ok(ServiceRecord::new(
        name,
        catalog.label_for(name),
        image,
        state,
        health,
        ports.replace("0.0.0.0:", ""),
    ))
}

fn parse_short_line(line: &str, catalog: &ServiceCatalog) -> Result<ServiceRecord> {
    let name = line
        .split_whitespace()
        .next()
        .ok_or_else(|| DomainError::MalformedLine("empty line".to_string()))?;

    let is_up = line.contains("Up");
    let state = if is_up {
        ServiceState::Up
    } else {
        ServiceState::Down
    };

    Ok(ServiceRecord::new(
        name,
        catalog.label_for(name),
        "unknown",
        state,
        HealthTag::Unknown,
        "",
    ))
}

/// Minimal record for a line that could not be parsed
fn degrade_line(line: &str) -> Option<ServiceRecord> {
    let name = line.split_whitespace().next()?;
    let is_up = line.contains("Up");

    Some(ServiceRecord {
        name: name.to_string(),
        service: name.replace("-fortress", "").replace("df-", ""),
        image: "unknown".to_string(),
        state: if is_up {
            ServiceState::Up
        } else {
            ServiceState::Down
        },
        health: HealthTag::Unknown,
        status: if is_up { "Running" } else { "Stopped" }.to_string(),
        ports: String::new(),
    })
}

/// Runs the process listing and parses it
pub struct StatusCollector {
    runner: Arc<dyn CommandRunner>,
    docker_program: String,
    catalog: ServiceCatalog,
}

impl StatusCollector {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        docker_program: impl Into<String>,
        catalog: ServiceCatalog,
    ) -> Self {
        Self {
            runner,
            docker_program: docker_program.into(),
            catalog,
        }
    }

    /// Current container records; empty if the listing command fails
    pub async fn collect(&self) -> Vec<ServiceRecord> {
        let args = argv(["ps", "--format", DOCKER_PS_FORMAT]);
        let outcome = self.runner.run_outcome(&self.docker_program, &args).await;

        if !outcome.success || outcome.stdout().is_empty() {
            warn!(
                returncode = outcome.returncode,
                error = ?outcome.error,
                "Container listing unavailable"
            );
            return Vec::new();
        }

        let records = parse_container_table(outcome.stdout(), &self.catalog);
        debug!(count = records.len(), "Container status collected");
        records
    }
}
