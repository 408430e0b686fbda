//! Persistence for closets and preferences, plus the Redis trend cache
//!
//! Handlers depend on the [`ClosetStore`] and [`PreferenceStore`] traits only.
//! Postgres backs them in production; the in-memory stores are used when no
//! database is configured and in tests.

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::{InMemoryClosetStore, InMemoryPreferenceStore};
pub use postgres::{create_pool, PgClosetStore, PgPreferenceStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;

use crate::{
    error::AppResult,
    models::{Closet, PreferenceRecord, PreferenceUpdate},
};

/// Per-user list of garment descriptions
#[async_trait::async_trait]
pub trait ClosetStore: Send + Sync {
    /// Items in insertion order; empty when the user has none
    async fn get(&self, user_id: &str) -> AppResult<Closet>;

    /// Replaces the whole closet
    async fn set(&self, user_id: &str, items: Closet) -> AppResult<()>;

    /// Appends one item
    async fn add_item(&self, user_id: &str, item: &str) -> AppResult<()>;

    /// Removes the first exact match; false when the item is not present
    async fn remove_item(&self, user_id: &str, item: &str) -> AppResult<bool>;
}

/// Per-user style preferences
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored record, or the default record when the user has none
    async fn get(&self, user_id: &str) -> AppResult<PreferenceRecord>;

    /// Merges the update into the stored record and returns the result
    async fn set(&self, user_id: &str, update: PreferenceUpdate) -> AppResult<PreferenceRecord>;
}
