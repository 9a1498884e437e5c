//! Application layer with the engine facade and its services.

/// Engine facade.
pub mod engine;
/// Resolution, extraction and enrichment services.
pub mod services;

pub use engine::SteamEngine;
pub use services::{
    BackgroundExtractor, GameNameService, IdentifierResolver, ItemPipeline, ProfileCache,
};
