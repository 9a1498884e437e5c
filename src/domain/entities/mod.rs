//! Domain entity definitions.

mod api_key;
mod background;
mod item;
mod steam_id;

pub use api_key::ApiKey;
pub use background::BackgroundAsset;
pub use item::{DisplayItem, ItemDefinition, ItemMedia};
pub use steam_id::{
    ResolvedIdentity, STEAM64_BASE, SteamId32, SteamId64, steam64_to_steam32,
};
