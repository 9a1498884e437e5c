//! Cache key spaces shared by the engine services.

use crate::domain::entities::{BackgroundAsset, ResolvedIdentity};
use crate::infrastructure::cache::ExpiringCache;

/// Key of the profile cache. Variants keep backgrounds and identities from
/// colliding on the same URL or name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileKey {
    /// Background of a profile URL.
    Background(String),
    /// Identity of a raw identifier.
    Identity(String),
}

/// Value stored in the profile cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRecord {
    /// Extracted background, including the "no background" result.
    Background(BackgroundAsset),
    /// Resolved identity.
    Identity(ResolvedIdentity),
}

/// Profile URL / identifier cache.
pub type ProfileCache = ExpiringCache<ProfileKey, ProfileRecord>;

/// Game name cache keyed by the image or store URL. `None` records an
/// unknown app.
pub type GameNameCache = ExpiringCache<String, Option<String>>;
