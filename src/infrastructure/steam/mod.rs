//! Steam web adapters: HTTP transport, payload envelopes and page extractors.

mod client;
pub(crate) mod dto;
pub mod markup;
pub mod patterns;

pub use client::{DEFAULT_USER_AGENT, SteamHttpClient};
