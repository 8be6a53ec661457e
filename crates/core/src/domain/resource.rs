// Resource Domain Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of `docker stats --no-stream`, copied verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub name: String,
    #[serde(rename = "cpu")]
    pub cpu_percent: String,
    pub memory: String,
    #[serde(rename = "network")]
    pub network_io: String,
    pub block_io: String,
}

/// Volume name -> human readable size (or a marker, see below)
pub type DiskUsage = BTreeMap<String, String>;

/// Marker when `du` fails for an existing path
pub const DISK_USAGE_UNAVAILABLE: &str = "N/A";

/// Marker when the volume directory does not exist
pub const DISK_USAGE_NOT_FOUND: &str = "Not found";
