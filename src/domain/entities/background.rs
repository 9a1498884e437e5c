//! Profile background media.

use serde::{Deserialize, Serialize};

/// Background media found on a community profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum BackgroundAsset {
    /// Static image set through the page's inline style.
    Image(String),
    /// Animated background video (MP4 source).
    Video(String),
    /// The profile has no background.
    None,
}

impl BackgroundAsset {
    /// Returns the asset URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image(url) | Self::Video(url) => Some(url),
            Self::None => None,
        }
    }

    /// Returns whether the profile has a background.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for BackgroundAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(url) | Self::Video(url) => write!(f, "{url}"),
            Self::None => write!(f, "Profile has no background"),
        }
    }
}
