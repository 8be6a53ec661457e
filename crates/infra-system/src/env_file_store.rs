// .env file store
// reason: tempfile for atomic replace of the shared .env
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use fortress_core::port::EnvStore;
use fortress_core::{AppError, Result};

#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Write `content` next to `path` and rename it into place
fn replace_atomically(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut temp = NamedTempFile::new_in(&parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl EnvStore for EnvFileStore {
    async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, content: &str) -> Result<()> {
        let path = self.path.clone();
        let content = content.to_string();
        tokio::task::spawn_blocking(move || replace_atomically(&path, &content))
            .await
            .map_err(|e| AppError::Internal(format!("env write task failed: {}", e)))??;

        debug!(path = %self.path.display(), "Replaced env file");
        Ok(())
    }
}
