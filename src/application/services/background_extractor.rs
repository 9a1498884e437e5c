//! Profile background extraction.

use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, trace, warn};

use super::profile_cache::{ProfileCache, ProfileKey, ProfileRecord};
use crate::domain::entities::BackgroundAsset;
use crate::domain::errors::EngineError;
use crate::domain::ports::HttpPort;
use crate::infrastructure::config::CacheConfig;
use crate::infrastructure::steam::markup;

const COMMUNITY_HOST: &str = "steamcommunity.com";

/// Rejects URLs that do not point at the Steam community site.
fn ensure_community_url(profile_url: &str) -> Result<(), EngineError> {
    let url = Url::parse(profile_url)
        .map_err(|e| EngineError::format(format!("invalid profile URL {profile_url:?}: {e}")))?;
    match url.host_str() {
        Some(COMMUNITY_HOST) => Ok(()),
        host => Err(EngineError::format(format!(
            "profile URL host {host:?} is not {COMMUNITY_HOST}"
        ))),
    }
}

/// Fetches community profile pages and extracts their background media.
pub struct BackgroundExtractor {
    http: Arc<dyn HttpPort>,
    cache: ProfileCache,
    ttls: CacheConfig,
}

impl BackgroundExtractor {
    /// Creates new extractor.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, cache: ProfileCache, ttls: CacheConfig) -> Self {
        Self { http, cache, ttls }
    }

    /// Returns the background of `profile_url`.
    ///
    /// Found assets and the "no background" result are both cached, the
    /// latter for a shorter time; failures are not cached.
    ///
    /// # Errors
    /// Returns `EngineError::Format` if the URL is not a community URL and
    /// `EngineError::Transport` if the page cannot be fetched.
    pub async fn extract_background(&self, profile_url: &str) -> Result<BackgroundAsset, EngineError> {
        if let Err(e) = ensure_community_url(profile_url) {
            warn!(url = %profile_url, error = %e, "Rejected profile URL");
            return Err(e);
        }

        let key = ProfileKey::Background(profile_url.to_string());
        if let Some(ProfileRecord::Background(asset)) = self.cache.lookup(&key) {
            trace!(url = %profile_url, "Using cached background");
            return Ok(asset);
        }

        debug!(url = %profile_url, "Fetching profile page");
        let html = self.http.get(profile_url, None).await?.into_body()?;
        let asset = markup::find_background(&html);

        let ttl = if asset.is_present() {
            self.ttls.background_ttl()
        } else {
            self.ttls.no_background_ttl()
        };
        debug!(url = %profile_url, asset = %asset, ?ttl, "Background extracted");
        self.cache
            .insert(key, ProfileRecord::Background(asset.clone()), ttl);

        Ok(asset)
    }
}
