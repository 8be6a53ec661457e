// Health Domain Model

use std::collections::BTreeMap;

/// Probe key ("api", "dashy") -> reachable
pub type HealthStatus = BTreeMap<String, bool>;

/// A sibling service checked over HTTP, with a process-listing fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Key in the resulting HealthStatus map
    pub key: String,
    pub url: String,
    /// Value for `docker ps --filter name=<...>` in the fallback check
    pub container_filter: String,
    /// Also accept "up" in the fallback output (not only "healthy")
    pub accept_up: bool,
}

impl ProbeTarget {
    pub fn new(
        key: impl Into<String>,
        url: impl Into<String>,
        container_filter: impl Into<String>,
        accept_up: bool,
    ) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            container_filter: container_filter.into(),
            accept_up,
        }
    }

    /// Default targets of the compose project
    pub fn defaults() -> Vec<ProbeTarget> {
        vec![
            ProbeTarget::new(
                "api",
                "http://localhost:8080/api/health",
                "dwarf-fortress",
                false,
            ),
            ProbeTarget::new("dashy", "http://localhost:4000/", "dashy", true),
        ]
    }

    /// Decide health from the fallback `docker ps` output
    ///
    /// Plain case-insensitive substring match: any `healthy` fragment counts,
    /// including the one inside `(unhealthy)`.
    pub fn accepts(&self, listing: &str) -> bool {
        let lower = listing.to_lowercase();
        lower.contains("healthy") || (self.accept_up && lower.contains("up"))
    }
}
