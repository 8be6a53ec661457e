// Application constants (no magic values in services)

/// `docker ps` layout consumed by the status collector
pub const DOCKER_PS_FORMAT: &str = "table {{.Names}}\t{{.Image}}\t{{.Status}}\t{{.Ports}}";

/// `docker ps` layout for the health fallback check
pub const DOCKER_PS_HEALTH_FORMAT: &str = "table {{.Names}}\t{{.Status}}";

/// `docker stats` layout consumed by the resource snapshotter
pub const DOCKER_STATS_FORMAT: &str =
    "table {{.Name}}\t{{.CPUPerc}}\t{{.MemUsage}}\t{{.NetIO}}\t{{.BlockIO}}";

/// Volume directories under the project base directory
pub const DEFAULT_VOLUMES: [&str; 3] = ["saves", "logs", "output"];

/// Default `docker-compose logs --tail` value
pub const DEFAULT_LOG_LINES: usize = 100;

/// Minimum tab-separated fields of a stats row
pub const STATS_MIN_FIELDS: usize = 5;

/// Minimum whitespace-run columns of a `docker ps` row (name, image, status)
pub const PS_MIN_COLUMNS: usize = 3;

/// Hint returned by the export placeholder endpoint
pub const EXPORT_SCRIPT_HINT: &str =
    "Run DFHack script: 'script /opt/dwarf-fortress/scripts/export_fortress_data.lua'";
