// Environment File Store Port

use crate::error::Result;
use async_trait::async_trait;

/// Raw access to the `.env` file
///
/// `write` must replace the file atomically; callers serialize
/// read-modify-write cycles themselves.
#[async_trait]
pub trait EnvStore: Send + Sync {
    /// File contents, None if the file does not exist
    async fn read(&self) -> Result<Option<String>>;

    /// Replace the whole file
    async fn write(&self, content: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory EnvStore for testing
    #[derive(Clone, Default)]
    pub struct MemoryEnvStore {
        content: Arc<Mutex<Option<String>>>,
        writes: Arc<Mutex<usize>>,
    }

    impl MemoryEnvStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_content(content: impl Into<String>) -> Self {
            let store = Self::default();
            *store.content.lock().unwrap() = Some(content.into());
            store
        }

        pub fn content(&self) -> Option<String> {
            self.content.lock().unwrap().clone()
        }

        pub fn write_count(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl EnvStore for MemoryEnvStore {
        async fn read(&self) -> Result<Option<String>> {
            Ok(self.content.lock().unwrap().clone())
        }

        async fn write(&self, content: &str) -> Result<()> {
            *self.content.lock().unwrap() = Some(content.to_string());
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }
}
