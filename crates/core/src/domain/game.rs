// Game Data Domain Model
// Fallback payloads and directory listing entries for the game data API

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Maximum lines returned per log file
pub const LOG_TAIL_LINES: usize = 50;

/// Log files looked up in the logs directory, in response order
pub const KNOWN_LOG_FILES: [&str; 3] = ["stderr.txt", "stdout.txt", "dfhack.log"];

/// File written by the in-game export script
pub const FORTRESS_DATA_FILE: &str = "fortress_data.json";

/// A save game directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEntry {
    pub name: String,
    /// ISO-8601 local time of last modification
    pub modified: String,
    pub size: u64,
}

/// A file in the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFileEntry {
    pub name: String,
    pub size: u64,
    pub modified: String,
    /// Extension with its leading dot, empty if none
    pub extension: String,
}

/// The recent part of one log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogTail {
    pub file: String,
    pub lines: Vec<String>,
    pub total_lines: usize,
}

impl LogTail {
    /// Keep the last `limit` lines, trimmed, with blank lines removed
    ///
    /// `total_lines` counts every line of the file, blank or not.
    pub fn from_content(file: impl Into<String>, content: &str, limit: usize) -> Self {
        let all: Vec<&str> = content.lines().collect();
        let start = all.len().saturating_sub(limit);
        let lines = all[start..]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect();

        Self {
            file: file.into(),
            lines,
            total_lines: all.len(),
        }
    }
}

/// Fixed values used when no fortress data has been exported yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortressPlaceholder {
    pub status: String,
    pub message: String,
    /// Reported as `fortress_info.name`
    pub name: String,
}

impl Default for FortressPlaceholder {
    fn default() -> Self {
        Self {
            status: "no_data".to_string(),
            message: "No fortress data available yet. Start the game and run data export."
                .to_string(),
            name: "Unknown".to_string(),
        }
    }
}

impl FortressPlaceholder {
    /// Full fortress statistics object with zeroed counters
    pub fn stats(&self, timestamp: &str) -> Value {
        json!({
            "status": self.status,
            "message": self.message,
            "timestamp": timestamp,
            "population": {
                "total": 0,
                "dwarves": 0,
                "animals": 0
            },
            "wealth": {
                "total": 0,
                "weapons": 0,
                "armor": 0,
                "furniture": 0
            },
            "fortress_info": {
                "name": self.name,
                "year": 0,
                "season": "Unknown"
            }
        })
    }
}

/// Population sub-object when the data file lacks one
pub fn default_population() -> Value {
    json!({
        "total": 0,
        "dwarves": 0,
        "animals": 0,
        "visitors": 0
    })
}

/// Wealth sub-object when the data file lacks one
pub fn default_wealth() -> Value {
    json!({
        "total": 0,
        "weapons": 0,
        "armor": 0,
        "furniture": 0,
        "other": 0
    })
}

/// Sample export written at startup so the dashboard has something to show
pub fn sample_fortress_data(timestamp: &str) -> Value {
    json!({
        "timestamp": timestamp,
        "population": {
            "total": 156,
            "dwarves": 134,
            "animals": 22,
            "visitors": 0
        },
        "wealth": {
            "total": 485230,
            "weapons": 12450,
            "armor": 8900,
            "furniture": 234500,
            "other": 229380
        },
        "fortress_info": {
            "name": "Mountainhomes",
            "year": 125,
            "season": "Late Spring"
        },
        "status": "active"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tail_limits_and_strips() {
        let content: String = (1..=80).map(|i| format!("  line {}  \n\n", i)).collect();
        let tail = LogTail::from_content("stderr.txt", &content, LOG_TAIL_LINES);

        assert_eq!(tail.total_lines, 160);
        assert!(tail.lines.len() <= LOG_TAIL_LINES);
        assert!(tail.lines.iter().all(|l| !l.is_empty()));
        assert_eq!(tail.lines.last().map(String::as_str), Some("line 80"));
        // Last 50 raw lines alternate content / blank -> 25 kept
        assert_eq!(tail.lines.len(), 25);
    }

    #[test]
    fn test_log_tail_short_file() {
        let tail = LogTail::from_content("dfhack.log", "a\n\nb\n", LOG_TAIL_LINES);
        assert_eq!(tail.lines, vec!["a", "b"]);
        assert_eq!(tail.total_lines, 3);
    }

    #[test]
    fn test_placeholder_stats() {
        let placeholder = FortressPlaceholder {
            name: "ARM Fortress".to_string(),
            ..Default::default()
        };
        let stats = placeholder.stats("2026-01-01T00:00:00");
        assert_eq!(stats["population"]["total"], 0);
        assert_eq!(stats["wealth"]["total"], 0);
        assert_eq!(stats["fortress_info"]["name"], "ARM Fortress");
        assert_eq!(stats["status"], "no_data");
    }
}
