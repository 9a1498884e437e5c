//! Vanity name / 64-bit / 32-bit identity resolution.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info, warn};

use super::profile_cache::{ProfileCache, ProfileKey, ProfileRecord};
use crate::domain::entities::{ApiKey, ResolvedIdentity, SteamId32, SteamId64};
use crate::domain::errors::EngineError;
use crate::domain::ports::HttpPort;
use crate::infrastructure::steam::dto::ResolveVanityEnvelope;
use crate::infrastructure::steam::{markup, patterns};

const RESOLVE_VANITY_URL: &str = "https://api.steampowered.com/ISteamUser/ResolveVanityURL/v0001/";
const COMMUNITY_BASE: &str = "https://steamcommunity.com";
const LOOKUP_SITE_BASE: &str = "https://steamid.xyz";

/// Builds the community profile URL for a vanity name or 64-bit ID.
#[must_use]
pub fn profile_url_for(identifier: &str) -> String {
    if patterns::is_steam64_form(identifier) {
        format!("{COMMUNITY_BASE}/profiles/{identifier}")
    } else {
        format!("{COMMUNITY_BASE}/id/{identifier}")
    }
}

/// Reduces a profile URL to its vanity name or 64-bit ID.
#[must_use]
pub fn normalize_identifier(raw: &str) -> &str {
    let raw = raw.trim();
    patterns::extract_profile_identifier(raw).unwrap_or(raw)
}

/// Resolves human-facing identifiers into account IDs.
///
/// The API path is tried at most once; any failure there triggers exactly one
/// scrape of a third-party lookup page.
pub struct IdentifierResolver {
    http: Arc<dyn HttpPort>,
    cache: ProfileCache,
    ttl: Duration,
}

impl IdentifierResolver {
    /// Creates new resolver.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, cache: ProfileCache, ttl: Duration) -> Self {
        Self { http, cache, ttl }
    }

    /// Resolves a vanity name, 64-bit ID or community profile URL, reusing a
    /// cached identity when present.
    ///
    /// # Errors
    /// See [`Self::resolve_vanity_to_steam_id`].
    pub async fn resolve_identity(
        &self,
        identifier: &str,
        api_key: Option<&ApiKey>,
    ) -> Result<ResolvedIdentity, EngineError> {
        let identifier = normalize_identifier(identifier);
        let key = ProfileKey::Identity(identifier.to_string());

        if let Some(ProfileRecord::Identity(identity)) = self.cache.lookup(&key) {
            debug!(identifier, "Using cached identity");
            return Ok(identity);
        }

        let identity = self.resolve_vanity_to_steam_id(identifier, api_key).await?;
        self.cache
            .insert(key, ProfileRecord::Identity(identity.clone()), self.ttl);
        Ok(identity)
    }

    /// Resolves a vanity name (or 64-bit ID) through the API, falling back
    /// to the scrape path.
    ///
    /// # Errors
    /// Without a key, returns the scrape error. With a key, returns
    /// `EngineError::Resolution` carrying both the API and scrape failures.
    pub async fn resolve_vanity_to_steam_id(
        &self,
        name: &str,
        api_key: Option<&ApiKey>,
    ) -> Result<ResolvedIdentity, EngineError> {
        let vanity = (!patterns::is_steam64_form(name)).then(|| name.to_string());

        let Some(api_key) = api_key else {
            debug!(name, "No API key, resolving via lookup page");
            let steam32 = self.resolve_via_scrape(name).await?;
            return Ok(ResolvedIdentity::from_steam32(vanity, steam32));
        };

        let primary = match self.resolve_vanity_via_api(name, api_key).await {
            Ok(steam64) => {
                info!(name, steam64 = %steam64, "Resolved via Steam API");
                return Ok(ResolvedIdentity::from_steam64(vanity, steam64));
            }
            Err(e) => e,
        };

        if primary.is_authorization() {
            warn!(key = %api_key, error = %primary, "API key rejected, falling back to lookup page");
        } else {
            warn!(name, error = %primary, "API resolution failed, falling back to lookup page");
        }

        match self.resolve_via_scrape(name).await {
            Ok(steam32) => Ok(ResolvedIdentity::from_steam32(vanity, steam32)),
            Err(fallback) => Err(EngineError::resolution(primary, fallback)),
        }
    }

    /// Resolves a vanity name through `ISteamUser/ResolveVanityURL`.
    ///
    /// # Errors
    /// Returns `EngineError::Authorization` on HTTP 401/403 or a "not
    /// authorized" body, `EngineError::Format` when the payload holds no
    /// valid ID, and `EngineError::Transport` otherwise.
    pub async fn resolve_vanity_via_api(
        &self,
        name: &str,
        api_key: &ApiKey,
    ) -> Result<SteamId64, EngineError> {
        let url = Url::parse_with_params(
            RESOLVE_VANITY_URL,
            &[("key", api_key.as_str()), ("vanityurl", name)],
        )
        .map_err(|e| EngineError::format(format!("invalid vanity URL request: {e}")))?;

        let body = self.http.get(url.as_str(), None).await?.into_body()?;
        if patterns::is_not_authorized(&body) {
            return Err(EngineError::authorization("API key not authorized"));
        }

        let envelope: ResolveVanityEnvelope = serde_json::from_str(&body)?;
        match envelope.response.steamid {
            Some(steamid) => steamid.parse(),
            None => Err(EngineError::format(format!(
                "no match for {name:?} (success={}, message={:?})",
                envelope.response.success, envelope.response.message
            ))),
        }
    }

    /// Resolves an identifier by scraping the legacy ID from a third-party
    /// lookup page.
    ///
    /// # Errors
    /// Returns `EngineError::Transport` if the page cannot be fetched and
    /// `EngineError::Format` if it holds no parseable `STEAM_0:u:a` value.
    pub async fn resolve_via_scrape(&self, identifier: &str) -> Result<SteamId32, EngineError> {
        let lookup_url = format!("{LOOKUP_SITE_BASE}/{}", profile_url_for(identifier));
        debug!(url = %lookup_url, "Fetching lookup page");

        let html = self.http.get(&lookup_url, None).await?.into_body()?;
        let value = markup::find_legacy_id_value(&html)
            .ok_or_else(|| EngineError::format("legacy ID input not found"))?;

        patterns::parse_legacy_steam_id(&value)
    }
}
