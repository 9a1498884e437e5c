//! Outbound HTTP port definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::EngineError;

/// Buffered response of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Returns whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the body of a 2xx response.
    ///
    /// # Errors
    /// Returns `EngineError::Authorization` for 401/403 and
    /// `EngineError::Transport` for any other non-2xx status.
    pub fn into_body(self) -> Result<String, EngineError> {
        match self.status {
            _ if self.is_success() => Ok(self.body),
            401 | 403 => Err(EngineError::authorization(format!("HTTP {}", self.status))),
            status => Err(EngineError::transport(format!("HTTP {status}"))),
        }
    }
}

/// Port for fetching pages and API payloads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpPort: Send + Sync {
    /// Issues a GET request and buffers the body.
    ///
    /// `timeout` bounds this call only; `None` defers to the transport's
    /// own limit.
    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<HttpResponse, EngineError>;
}
