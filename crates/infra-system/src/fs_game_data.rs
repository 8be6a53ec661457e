// Filesystem game data source
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use fortress_core::domain::{OutputFileEntry, SaveEntry, FORTRESS_DATA_FILE};
use fortress_core::port::time_provider::format_system_time;
use fortress_core::port::GameDataSource;
use fortress_core::Result;

/// Reads the directories the game writes into
#[derive(Debug, Clone)]
pub struct FsGameDataSource {
    output_dir: PathBuf,
    saves_dir: PathBuf,
    logs_dir: PathBuf,
}

impl FsGameDataSource {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        saves_dir: impl Into<PathBuf>,
        logs_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            saves_dir: saves_dir.into(),
            logs_dir: logs_dir.into(),
        }
    }

    fn fortress_file(&self) -> PathBuf {
        self.output_dir.join(FORTRESS_DATA_FILE)
    }
}

/// Directory entries, or nothing if the directory is missing
async fn read_dir_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Directory missing");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        entries.push(entry);
    }
    Ok(entries)
}

fn modified_iso(metadata: &std::fs::Metadata) -> String {
    metadata
        .modified()
        .map(format_system_time)
        .unwrap_or_default()
}

#[async_trait]
impl GameDataSource for FsGameDataSource {
    async fn read_fortress_data(&self) -> Option<Value> {
        let path = self.fortress_file();
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to read fortress data");
                }
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Fortress data is not valid JSON");
                None
            }
        }
    }

    async fn write_fortress_data(&self, data: &Value) -> Result<()> {
        self.ensure_output_dir().await?;
        let body = serde_json::to_string_pretty(data)?;
        fs::write(self.fortress_file(), body).await?;
        Ok(())
    }

    async fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    async fn list_saves(&self) -> Result<Vec<SaveEntry>> {
        let mut saves = Vec::new();
        for entry in read_dir_entries(&self.saves_dir).await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }
            saves.push(SaveEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                modified: modified_iso(&metadata),
                size: metadata.len(),
            });
        }
        Ok(saves)
    }

    async fn list_output_files(&self) -> Result<Vec<OutputFileEntry>> {
        let mut files = Vec::new();
        for entry in read_dir_entries(&self.output_dir).await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            let extension = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            files.push(OutputFileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: modified_iso(&metadata),
                extension,
            });
        }
        Ok(files)
    }

    async fn read_logs(&self, names: &[&str]) -> Result<Vec<(String, String)>> {
        let mut logs = Vec::new();
        for name in names {
            let path = self.logs_dir.join(name);
            match fs::read(&path).await {
                Ok(bytes) => {
                    logs.push((name.to_string(), String::from_utf8_lossy(&bytes).into_owned()))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(logs)
    }
}
