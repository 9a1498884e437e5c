//! Engine services.

pub mod background_extractor;
pub mod game_name_service;
pub mod identifier_resolver;
pub mod item_pipeline;
pub mod profile_cache;

pub use background_extractor::BackgroundExtractor;
pub use game_name_service::GameNameService;
pub use identifier_resolver::{IdentifierResolver, normalize_identifier, profile_url_for};
pub use item_pipeline::{ItemPipeline, market_listing_url};
pub use profile_cache::{GameNameCache, ProfileCache, ProfileKey, ProfileRecord};
