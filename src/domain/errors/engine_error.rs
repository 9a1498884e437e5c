//! Engine error types.

use thiserror::Error;

/// Failure modes of identity, background and market lookups.
///
/// "Not found" outcomes are not errors; they are carried as sentinel values
/// in successful results.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum EngineError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("unexpected response format: {message}")]
    Format { message: String },

    #[error("API key rejected: {message}")]
    Authorization { message: String },

    #[error("identity resolution failed: {primary}; fallback also failed: {fallback}")]
    Resolution {
        primary: Box<EngineError>,
        fallback: Box<EngineError>,
    },
}

impl EngineError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates format error.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Creates authorization error.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Combines a failed primary attempt with its failed fallback.
    #[must_use]
    pub fn resolution(primary: Self, fallback: Self) -> Self {
        Self::Resolution {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }

    /// Returns whether the service could not be reached.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns whether the service answered in an unexpected shape.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Returns whether the API key was rejected.
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }

    /// Returns the error that ended the attempt chain.
    #[must_use]
    pub fn terminal(&self) -> &Self {
        match self {
            Self::Resolution { fallback, .. } => fallback.terminal(),
            other => other,
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::transport(format!("failed to connect: {e}"))
        } else if e.is_decode() {
            Self::format(e.to_string())
        } else {
            Self::transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        Self::format(format!("invalid JSON: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(EngineError::transport("down").is_transport());
        assert!(EngineError::format("bad").is_format());
        assert!(EngineError::authorization("403").is_authorization());
    }

    #[test]
    fn test_resolution_keeps_both_causes() {
        let err = EngineError::resolution(
            EngineError::authorization("key rejected"),
            EngineError::format("input not found"),
        );

        let message = err.to_string();
        assert!(message.contains("key rejected"));
        assert!(message.contains("input not found"));
        assert!(err.terminal().is_format());
    }
}
