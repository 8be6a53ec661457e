// HTTP probe implementation
// reason: reqwest with connect/total timeouts, no retries
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use fortress_core::port::{HttpProbe, ProbeError};

/// Connect timeout for probes (5s)
pub const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall request timeout for probes (10s)
pub const PROBE_TOTAL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ReqwestHttpProbe {
    client: Client,
}

impl ReqwestHttpProbe {
    pub fn new() -> Result<Self, ProbeError> {
        Self::with_timeouts(PROBE_CONNECT_TIMEOUT, PROBE_TOTAL_TIMEOUT)
    }

    pub fn with_timeouts(connect: Duration, total: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .connect_timeout(connect)
            .timeout(total)
            .build()
            .map_err(|e| ProbeError::Connection(format!("Failed to create client: {}", e)))?;
        Ok(Self { client })
    }
}

fn to_probe_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_decode() {
        ProbeError::Parse(err.to_string())
    } else {
        ProbeError::Connection(err.to_string())
    }
}

#[async_trait]
impl HttpProbe for ReqwestHttpProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "Probe failed");
                false
            }
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError> {
        let response = self.client.get(url).send().await.map_err(to_probe_error)?;

        if !response.status().is_success() {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        response.json().await.map_err(to_probe_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_port() {
        // Bind and drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe =
            ReqwestHttpProbe::with_timeouts(Duration::from_millis(500), Duration::from_secs(1))
                .unwrap();
        let url = format!("http://{}/api/health", addr);

        assert!(!probe.is_reachable(&url).await);
        assert!(probe.fetch_json(&url).await.is_err());
    }
}
