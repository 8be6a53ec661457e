// HTTP Probe Port
// Reachability checks and JSON fetches against sibling services

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// HTTP probe port
///
/// Implementations enforce their own connect/overall timeouts; callers never retry.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// GET the URL; true on a 2xx response
    async fn is_reachable(&self, url: &str) -> bool;

    /// GET the URL and decode the body as JSON
    async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock HttpProbe for testing; unknown URLs are unreachable
    #[derive(Clone, Default)]
    pub struct MockHttpProbe {
        reachable: Arc<Mutex<HashMap<String, bool>>>,
        bodies: Arc<Mutex<HashMap<String, Value>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockHttpProbe {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_reachable(self, url: impl Into<String>, reachable: bool) -> Self {
            self.reachable.lock().unwrap().insert(url.into(), reachable);
            self
        }

        pub fn with_json(self, url: impl Into<String>, body: Value) -> Self {
            self.bodies.lock().unwrap().insert(url.into(), body);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpProbe for MockHttpProbe {
        async fn is_reachable(&self, url: &str) -> bool {
            self.calls.lock().unwrap().push(url.to_string());
            self.reachable
                .lock()
                .unwrap()
                .get(url)
                .copied()
                .unwrap_or(false)
        }

        async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.bodies
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| ProbeError::Connection(format!("{} unreachable", url)))
        }
    }
}
