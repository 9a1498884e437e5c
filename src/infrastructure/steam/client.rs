//! reqwest-backed HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::EngineError;
use crate::domain::ports::{HttpPort, HttpResponse};

/// Default browser-like user agent; community pages serve reduced markup to
/// unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Steam web client.
#[derive(Debug, Clone)]
pub struct SteamHttpClient {
    client: Client,
}

impl SteamHttpClient {
    /// Creates client with default settings.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_settings(DEFAULT_USER_AGENT, Duration::from_secs(30))
    }

    /// Creates client with a custom user agent and overall request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpPort for SteamHttpClient {
    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<HttpResponse, EngineError> {
        debug!(url = %url, ?timeout, "GET");

        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            EngineError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read response body");
            EngineError::from(e)
        })?;

        debug!(url = %url, status, bytes = body.len(), "Response received");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SteamHttpClient::new();
        assert!(client.is_ok());
    }
}
