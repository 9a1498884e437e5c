//! Steam Web API key value object.

use std::fmt;

/// Steam Web API key with masking.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Creates a key, returning `None` for blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return None;
        }
        Some(Self { value })
    }

    /// Returns key as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked key for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars = self.value.chars().count();
        if chars <= 8 {
            return "*".repeat(chars);
        }

        let visible_prefix: String = self.value.chars().take(4).collect();
        format!("{visible_prefix}...")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}
