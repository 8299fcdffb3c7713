//! Cache read path
//!
//! Serves tracked resources from the store. A miss triggers a targeted,
//! synchronous refresh of just that key, followed by a second read. If the
//! key is still absent the caller gets `CacheMissAfterRefresh`, never an
//! empty list: an empty list is a real cached value.

use crate::error::{Error, Result};
use crate::refresh::{RefreshOrchestrator, RefreshOutcome};
use crate::store::{decode_entry, SharedStore};
use crate::types::{Item, ResourceCatalog};
use std::sync::Arc;
use tracing::{debug, info};

/// Read-side facade over the store and the orchestrator
#[derive(Clone)]
pub struct CacheService {
    store: SharedStore,
    orchestrator: Arc<RefreshOrchestrator>,
}

impl CacheService {
    /// Create a new service
    pub fn new(store: SharedStore, orchestrator: Arc<RefreshOrchestrator>) -> Self {
        Self {
            store,
            orchestrator,
        }
    }

    /// The tracked resources
    pub fn catalog(&self) -> &ResourceCatalog {
        self.orchestrator.catalog()
    }

    /// The orchestrator used for miss-triggered refreshes
    pub fn orchestrator(&self) -> &Arc<RefreshOrchestrator> {
        &self.orchestrator
    }

    /// Get a tracked resource, populating it from upstream on a miss
    pub async fn get_resource(&self, key: &str) -> Result<Vec<Item>> {
        if !self.catalog().contains(key) {
            return Err(Error::not_tracked(key));
        }

        if let Some(items) = self.get_raw(key).await? {
            debug!("Cache hit for '{}'", key);
            return Ok(items);
        }

        info!("Cache miss for '{}', refreshing", key);
        let outcome = self.orchestrator.refresh_key(key).await?;
        if let RefreshOutcome::Failed { reason } = &outcome {
            debug!("Miss-triggered refresh of '{}' failed: {}", key, reason);
        }

        self.get_raw(key)
            .await?
            .ok_or_else(|| Error::miss_after_refresh(key))
    }

    /// Read any key directly, without triggering a refresh
    pub async fn get_raw(&self, key: &str) -> Result<Option<Vec<Item>>> {
        match self.store.get(key).await? {
            Some(blob) => decode_entry(key, &blob).map(Some),
            None => Ok(None),
        }
    }

    /// Keys currently held by the store
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        self.store.list_keys().await
    }

    /// Drop one cached key
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        self.store.delete(key).await
    }

    /// Drop every cached key
    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear_all().await
    }

    /// Check that the store is reachable
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}
