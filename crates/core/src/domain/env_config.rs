// Environment File Model
// Flat KEY=VALUE file shared with docker-compose

use serde_json::{Map, Value};

/// First header line written on every update
pub const ENV_FILE_TITLE: &str = "# Dwarf Fortress Container Configuration";

/// Ordered `KEY=VALUE` entries of the environment file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvEntries {
    entries: Vec<(String, String)>,
}

impl EnvEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents
    ///
    /// A line counts if it contains `=` and does not start with `#`; it is
    /// trimmed and split at the first `=`. Later duplicates replace earlier ones.
    pub fn parse(content: &str) -> Self {
        let mut parsed = Self::new();
        for line in content.lines() {
            if line.starts_with('#') || !line.contains('=') {
                continue;
            }
            if let Some((key, value)) = line.trim().split_once('=') {
                parsed.set(key, value);
            }
        }
        parsed
    }

    /// Insert or replace; replaced keys keep their position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overlay a JSON object onto the entries
    pub fn merge_json(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            self.set(key.clone(), env_value(value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object view for the config endpoint
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    /// Render the file: two comment lines, a blank line, one entry per line
    pub fn render(&self, updated_at: &str) -> String {
        let mut out = String::new();
        out.push_str(ENV_FILE_TITLE);
        out.push('\n');
        out.push_str(&format!("# Updated: {}\n\n", updated_at));
        for (key, value) in &self.entries {
            out.push_str(&format!("{}={}\n", key, value));
        }
        out
    }
}

/// Text written for a JSON value: strings raw, null empty, the rest as JSON
fn env_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
