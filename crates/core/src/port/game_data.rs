// Game Data Port
// Read-only view of the game's output, save and log directories

use crate::domain::{OutputFileEntry, SaveEntry};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Game data source
///
/// Listing order is unspecified; the application layer sorts.
#[async_trait]
pub trait GameDataSource: Send + Sync {
    /// Parsed fortress export, None if missing or not valid JSON
    async fn read_fortress_data(&self) -> Option<Value>;

    /// Overwrite the fortress export (used for sample data)
    async fn write_fortress_data(&self, data: &Value) -> Result<()>;

    /// Create the output directory if it does not exist
    async fn ensure_output_dir(&self) -> Result<()>;

    /// Save game directories; empty if the saves directory is missing
    async fn list_saves(&self) -> Result<Vec<SaveEntry>>;

    /// Regular files of the output directory; empty if it is missing
    async fn list_output_files(&self) -> Result<Vec<OutputFileEntry>>;

    /// Contents of the named log files that exist, in the given order
    async fn read_logs(&self, names: &[&str]) -> Result<Vec<(String, String)>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory GameDataSource for testing
    #[derive(Clone, Default)]
    pub struct MockGameData {
        pub fortress: Arc<Mutex<Option<Value>>>,
        pub saves: Arc<Mutex<Vec<SaveEntry>>>,
        pub output_files: Arc<Mutex<Vec<OutputFileEntry>>>,
        pub logs: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MockGameData {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_fortress(self, data: Value) -> Self {
            *self.fortress.lock().unwrap() = Some(data);
            self
        }

        pub fn with_save(self, entry: SaveEntry) -> Self {
            self.saves.lock().unwrap().push(entry);
            self
        }

        pub fn with_output_file(self, entry: OutputFileEntry) -> Self {
            self.output_files.lock().unwrap().push(entry);
            self
        }

        pub fn with_log(self, name: impl Into<String>, content: impl Into<String>) -> Self {
            self.logs.lock().unwrap().insert(name.into(), content.into());
            self
        }
    }

    #[async_trait]
    impl GameDataSource for MockGameData {
        async fn read_fortress_data(&self) -> Option<Value> {
            self.fortress.lock().unwrap().clone()
        }

        async fn write_fortress_data(&self, data: &Value) -> Result<()> {
            *self.fortress.lock().unwrap() = Some(data.clone());
            Ok(())
        }

        async fn ensure_output_dir(&self) -> Result<()> {
            Ok(())
        }

        async fn list_saves(&self) -> Result<Vec<SaveEntry>> {
            Ok(self.saves.lock().unwrap().clone())
        }

        async fn list_output_files(&self) -> Result<Vec<OutputFileEntry>> {
            Ok(self.output_files.lock().unwrap().clone())
        }

        async fn read_logs(&self, names: &[&str]) -> Result<Vec<(String, String)>> {
            let logs = self.logs.lock().unwrap();
            Ok(names
                .iter()
                .filter_map(|name| logs.get(*name).map(|c| (name.to_string(), c.clone())))
                .collect())
        }
    }
}
