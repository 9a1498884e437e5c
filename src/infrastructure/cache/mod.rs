//! In-memory caches.

mod expiring_cache;

pub use expiring_cache::ExpiringCache;
