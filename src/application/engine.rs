//! Engine facade over the resolution services.

use std::sync::Arc;

use tracing::debug;

use super::services::{
    BackgroundExtractor, GameNameCache, GameNameService, IdentifierResolver, ItemPipeline,
    ProfileCache,
};
use crate::domain::entities::{ApiKey, BackgroundAsset, DisplayItem, ResolvedIdentity, SteamId64};
use crate::domain::errors::EngineError;
use crate::domain::ports::HttpPort;
use crate::infrastructure::cache::ExpiringCache;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::steam::patterns;

/// Entry point for identity, background, game and item lookups.
///
/// Owns one profile cache (backgrounds and identities) and one game name
/// cache for its whole lifetime.
pub struct SteamEngine {
    resolver: IdentifierResolver,
    backgrounds: BackgroundExtractor,
    games: GameNameService,
    items: ItemPipeline,
}

impl SteamEngine {
    /// Creates an engine with fresh caches. Must be called inside a Tokio
    /// runtime.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, config: &AppConfig) -> Self {
        Self::with_caches(
            http,
            ExpiringCache::new("profiles"),
            ExpiringCache::new("games"),
            config,
        )
    }

    /// Creates an engine over existing caches.
    #[must_use]
    pub fn with_caches(
        http: Arc<dyn HttpPort>,
        profiles: ProfileCache,
        games: GameNameCache,
        config: &AppConfig,
    ) -> Self {
        debug!(
            max_concurrency = config.http.max_concurrency,
            "Creating Steam engine"
        );
        Self {
            resolver: IdentifierResolver::new(
                Arc::clone(&http),
                profiles.clone(),
                config.cache.identity_ttl(),
            ),
            backgrounds: BackgroundExtractor::new(Arc::clone(&http), profiles, config.cache.clone()),
            games: GameNameService::new(Arc::clone(&http), games, config.cache.clone()),
            items: ItemPipeline::new(http, &config.http),
        }
    }

    /// Resolves a vanity name or 64-bit ID into all three ID forms.
    ///
    /// # Errors
    /// Returns the scrape failure, or a composite error when both the API and
    /// the scrape fallback failed.
    pub async fn resolve_identity(
        &self,
        identifier: &str,
        api_key: Option<&ApiKey>,
    ) -> Result<ResolvedIdentity, EngineError> {
        self.resolver.resolve_identity(identifier, api_key).await
    }

    /// Returns the background media of a community profile.
    ///
    /// # Errors
    /// Returns `EngineError::Format` for a non-community URL and
    /// `EngineError::Transport` if the profile cannot be fetched.
    pub async fn get_background(&self, profile_url: &str) -> Result<BackgroundAsset, EngineError> {
        self.backgrounds.extract_background(profile_url).await
    }

    /// Returns the game name behind a store or image URL.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn get_game_name(&self, url: &str) -> Result<Option<String>, EngineError> {
        self.games.get_game_name(url).await
    }

    /// Lists the equipped profile items of an account.
    ///
    /// # Errors
    /// Returns an error if the loyalty rewards service cannot be queried.
    pub async fn list_equipped_items(
        &self,
        steam64: SteamId64,
        language: &str,
    ) -> Result<Vec<DisplayItem>, EngineError> {
        self.items.list_equipped_items(steam64, language).await
    }

    /// Attaches market listing data to items lacking it.
    pub async fn enrich_with_market_data(
        &self,
        items: Vec<DisplayItem>,
        currency: u32,
    ) -> Vec<DisplayItem> {
        self.items.enrich_with_market_data(items, currency).await
    }

    /// Fills in the market price of an item with a known listing ID.
    pub async fn fetch_market_price(&self, item: DisplayItem, currency: u32) -> DisplayItem {
        self.items.fetch_market_price(item, currency).await
    }

    /// Extracts the app ID from a store or image URL.
    #[must_use]
    pub fn extract_app_id(url: &str) -> Option<&str> {
        patterns::extract_app_id(url)
    }
}
