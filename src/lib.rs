//! Steamlens - Steam identity and asset resolution.
//!
//! This crate resolves Steam account identifiers into every ID form, extracts
//! community profile backgrounds, looks up game names and enriches equipped
//! profile items with Steam Community Market data, caching results in memory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the engine and its services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "steamlens";
