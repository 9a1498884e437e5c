//! Game name lookup for store and image URLs.

use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, trace};

use super::profile_cache::GameNameCache;
use crate::domain::errors::EngineError;
use crate::domain::ports::HttpPort;
use crate::infrastructure::config::CacheConfig;
use crate::infrastructure::steam::dto::AppDetailsEnvelope;
use crate::infrastructure::steam::patterns;

const APP_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

/// Resolves the game an image or store URL belongs to.
pub struct GameNameService {
    http: Arc<dyn HttpPort>,
    cache: GameNameCache,
    ttls: CacheConfig,
}

impl GameNameService {
    /// Creates new service.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, cache: GameNameCache, ttls: CacheConfig) -> Self {
        Self { http, cache, ttls }
    }

    /// Returns the name of the app referenced by `url`.
    ///
    /// `Ok(None)` means the URL carries no app ID or the store does not know
    /// the app; unknown apps are cached for a shorter time than names.
    ///
    /// # Errors
    /// Returns `EngineError::Transport` if the store cannot be reached and
    /// `EngineError::Format` if it answers with an unexpected payload.
    pub async fn get_game_name(&self, url: &str) -> Result<Option<String>, EngineError> {
        if let Some(cached) = self.cache.lookup(&url.to_string()) {
            trace!(url = %url, "Using cached game name");
            return Ok(cached);
        }

        let Some(app_id) = patterns::extract_app_id(url) else {
            debug!(url = %url, "No app ID in URL");
            return Ok(None);
        };

        let request = Url::parse_with_params(APP_DETAILS_URL, &[("appids", app_id)])
            .map_err(|e| EngineError::format(format!("invalid app details request: {e}")))?;
        let body = self.http.get(request.as_str(), None).await?.into_body()?;
        let details: AppDetailsEnvelope = serde_json::from_str(&body)?;

        let name = details
            .get(app_id)
            .filter(|entry| entry.success)
            .and_then(|entry| entry.data.as_ref())
            .map(|data| data.name.clone());

        let ttl = if name.is_some() {
            self.ttls.game_name_ttl()
        } else {
            self.ttls.missing_game_ttl()
        };
        debug!(app_id, name = ?name, "Resolved game name");
        self.cache.insert(url.to_string(), name.clone(), ttl);

        Ok(name)
    }
}
