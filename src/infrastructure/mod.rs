//! Infrastructure layer with external service adapters.

/// Expiring in-memory caches.
pub mod cache;
/// Application configuration.
pub mod config;
/// Steam web client and page extractors.
pub mod steam;

pub use cache::ExpiringCache;
pub use config::{AppConfig, CliArgs, Command, ConfigLoader, LogLevel};
pub use steam::SteamHttpClient;
