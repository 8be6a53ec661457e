// Service Domain Model
// One record per container line of `docker ps` output; recomputed per request

use serde::{Deserialize, Serialize};

/// Container state as reported by the process listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    Up,
    Exited,
    Down,
    Unknown,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Up => write!(f, "Up"),
            ServiceState::Exited => write!(f, "Exited"),
            ServiceState::Down => write!(f, "Down"),
            ServiceState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Health tag extracted from the parenthesised part of a status column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTag {
    Starting,
    Healthy,
    Unhealthy,
    Running,
    Unknown,
}

impl HealthTag {
    /// Classify a status fragment.
    ///
    /// Order: `(health: starting)`, `(unhealthy)`, `(healthy)`, then `running`
    /// when the container is up. `(unhealthy)` wins over `(healthy)` if a
    /// string ever carries both.
    pub fn classify(text: &str, is_up: bool) -> Self {
        if !is_up {
            return HealthTag::Unknown;
        }
        if text.contains("(health: starting)") {
            HealthTag::Starting
        } else if text.contains("(unhealthy)") {
            HealthTag::Unhealthy
        } else if text.contains("(healthy)") {
            HealthTag::Healthy
        } else {
            HealthTag::Running
        }
    }
}

impl std::fmt::Display for HealthTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthTag::Starting => write!(f, "starting"),
            HealthTag::Healthy => write!(f, "healthy"),
            HealthTag::Unhealthy => write!(f, "unhealthy"),
            HealthTag::Running => write!(f, "running"),
            HealthTag::Unknown => write!(f, "unknown"),
        }
    }
}

/// Status record for one managed container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    /// Logical service label (e.g. `dashy`)
    pub service: String,
    pub image: String,
    pub state: ServiceState,
    pub health: HealthTag,
    /// Display string for the dashboard
    pub status: String,
    pub ports: String,
}

impl ServiceRecord {
    /// Build a record, deriving the display status from state and health
    pub fn new(
        name: impl Into<String>,
        service: impl Into<String>,
        image: impl Into<String>,
        state: ServiceState,
        health: HealthTag,
        ports: impl Into<String>,
    ) -> Self {
        let status = if health == HealthTag::Unknown {
            state.to_string()
        } else {
            format!("{} ({})", state, health)
        };

        Self {
            name: name.into(),
            service: service.into(),
            image: image.into(),
            state,
            health,
            status,
            ports: ports.into(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.state == ServiceState::Up
    }
}

/// Substring rule mapping a container name to a logical service label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    pub infix: String,
    pub label: String,
}

impl LabelRule {
    pub fn new(infix: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            infix: infix.into(),
            label: label.into(),
        }
    }
}

/// Known containers and how they are named
///
/// `container_filters` selects lines of `docker ps`, `stats_filters` selects
/// lines of `docker stats`; the two sets differ on purpose in the deployed
/// compose project (stats uses the short service names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    pub container_filters: Vec<String>,
    pub stats_filters: Vec<String>,
    pub labels: Vec<LabelRule>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self {
            container_filters: vec![
                "dashy-fortress".to_string(),
                "df-web-manager".to_string(),
                "dwarf-fortress-ai".to_string(),
            ],
            stats_filters: vec![
                "dwarf-fortress".to_string(),
                "dashy".to_string(),
                "web-manager".to_string(),
            ],
            labels: vec![
                LabelRule::new("dwarf-fortress-ai", "dwarf-fortress"),
                LabelRule::new("dashy-fortress", "dashy"),
                LabelRule::new("df-web-manager", "web-manager"),
            ],
        }
    }
}

impl ServiceCatalog {
    /// True if the line mentions one of the known containers
    pub fn matches_container(&self, line: &str) -> bool {
        self.container_filters.iter().any(|f| line.contains(f.as_str()))
    }

    /// True if the stats line mentions one of the known services
    pub fn matches_stats(&self, line: &str) -> bool {
        self.stats_filters.iter().any(|f| line.contains(f.as_str()))
    }

    /// Map a container name to its logical label; first matching rule wins
    pub fn label_for(&self, name: &str) -> String {
        self.labels
            .iter()
            .find(|rule| name.contains(rule.infix.as_str()))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| name.to_string())
    }
}
