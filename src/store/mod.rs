//! Cache store module
//!
//! The key-value store that holds cached collections. Expiry is owned by the
//! store: an entry past its TTL is indistinguishable from one never written.
//!
//! # Overview
//!
//! - `CacheStore` - the get/set/exists/clear/list/ping contract
//! - `MemoryStore` - in-process map with per-key expiry
//! - `RedisStore` - Redis-backed store for sharing a cache across processes
//!
//! Entries are whole-collection JSON arrays; there is no partial update.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::{RedisStore, DEFAULT_PREFIX};

use crate::error::{Error, Result};
use crate::types::Item;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

/// Key-value store with per-key expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a blob; expired or missing keys are `None`
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write a blob, replacing any previous value, expiring after `ttl`
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<()>;

    /// Whether a non-expired value exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remove one key; returns whether it was present
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every key
    async fn clear_all(&self) -> Result<()>;

    /// All non-expired keys, sorted
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;
}

/// Store handle shared across tasks
pub type SharedStore = Arc<dyn CacheStore>;

/// Serialize a resolved collection into a cache blob
pub fn encode_entry(items: &[Item]) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(items)?))
}

/// Deserialize a cache blob back into records
pub fn decode_entry(key: &str, blob: &[u8]) -> Result<Vec<Item>> {
    serde_json::from_slice(blob).map_err(|e| Error::corrupt(key, e.to_string()))
}
