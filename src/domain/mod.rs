//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{
    ApiKey, BackgroundAsset, DisplayItem, ItemDefinition, ItemMedia, ResolvedIdentity, SteamId32,
    SteamId64,
};
pub use errors::EngineError;
pub use ports::{HttpPort, HttpResponse};
