pub mod locks;
pub mod memory;
pub mod redis;

use std::fmt::Display;

use crate::error::AppResult;

pub use locks::KeyLocks;
pub use memory::MemoryStore;
pub use self::redis::create_redis_client;
pub use self::redis::RedisStore;

/// Well-known storage slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The serialized favorites collection
    SavedMovies,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::SavedMovies => write!(f, "savedMovies"),
        }
    }
}

/// Persistent string key-value store
///
/// `set` replaces the whole value; there is no compare-and-swap, so
/// read-modify-write cycles must be serialized by the caller.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value, or `None` if the key was never written
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the value stored under `key`
    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
