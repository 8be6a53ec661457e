// Environment Config Service
// Lock-scoped read-modify-write of the .env file

use crate::domain::EnvEntries;
use crate::error::{AppError, Result};
use crate::port::{EnvStore, TimeProvider};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub struct ConfigService {
    store: Arc<dyn EnvStore>,
    time_provider: Arc<dyn TimeProvider>,
    /// Serializes updates; the store itself only guarantees atomic replace
    write_lock: Mutex<()>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn EnvStore>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            store,
            time_provider,
            write_lock: Mutex::new(()),
        }
    }

    /// Current entries; empty when the file does not exist
    pub async fn load(&self) -> Result<EnvEntries> {
        Ok(self
            .store
            .read()
            .await?
            .map(|content| EnvEntries::parse(&content))
            .unwrap_or_default())
    }

    /// Overlay a JSON object onto the file and rewrite it
    ///
    /// # Errors
    /// - AppError::Validation if `patch` is not a JSON object
    pub async fn update(&self, patch: &Value) -> Result<EnvEntries> {
        let patch = patch.as_object().ok_or_else(|| {
            AppError::Validation("configuration update must be a JSON object".to_string())
        })?;

        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        entries.merge_json(patch);

        let content = entries.render(&self.time_provider.now_iso());
        self.store.write(&content).await?;

        info!(
            updated_keys = patch.len(),
            total_keys = entries.len(),
            "Environment file updated"
        );

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::env_config::ENV_FILE_TITLE;
    use crate::port::env_store::mocks::MemoryEnvStore;
    use crate::port::time_provider::FixedTimeProvider;
    use serde_json::json;

    fn service(store: &MemoryEnvStore) -> ConfigService {
        ConfigService::new(
            Arc::new(store.clone()),
            Arc::new(FixedTimeProvider::new("2026-10-19T08:30:00.000000")),
        )
    }

    #[tokio::test]
    async fn test_update_merges_existing() {
        let store = MemoryEnvStore::with_content("B=2\n");
        service(&store).update(&json!({"A": "1"})).await.unwrap();

        let content = store.content().unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], ENV_FILE_TITLE);
        assert_eq!(lines[1], "# Updated: 2026-10-19T08:30:00.000000");
        assert!(lines.contains(&"A=1"));
        assert!(lines.contains(&"B=2"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let store = MemoryEnvStore::new();
        assert!(service(&store).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_object() {
        let store = MemoryEnvStore::new();
        let result = service(&store).update(&json!(["A", "1"])).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_updates_keep_all_keys() {
        let store = MemoryEnvStore::with_content("BASE=0\n");
        let service = Arc::new(service(&store));

        let mut handles = vec![];
        for i in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let mut patch = serde_json::Map::new();
                patch.insert(format!("KEY_{}", i), json!(i.to_string()));
                service.update(&Value::Object(patch)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let entries = service.load().await.unwrap();
        assert_eq!(entries.len(), 11);
        assert_eq!(store.write_count(), 10);
    }
}
