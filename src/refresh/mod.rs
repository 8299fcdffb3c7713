//! Refresh orchestration
//!
//! Keeps tracked resources warm in the cache store.
//!
//! # Overview
//!
//! For each tracked key the orchestrator:
//! 1. Skips the key if the store already holds a live entry
//! 2. Otherwise resolves the full collection from upstream
//! 3. Writes it whole, with the configured TTL, only if resolution succeeded
//!
//! The freshness check is the only de-duplication. Two overlapping refreshes
//! of the same key may both fetch; whichever writes last wins, and both
//! write the same complete collection.

mod types;

pub use types::{RefreshOutcome, RefreshReport, ResourceRefresh};

use crate::error::{Error, Result};
use crate::resolver::CollectionResolver;
use crate::store::{encode_entry, SharedStore};
use crate::types::{ResourceCatalog, TrackedResource};
use chrono::Utc;
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Populates the cache store from upstream
pub struct RefreshOrchestrator {
    resolver: CollectionResolver,
    store: SharedStore,
    catalog: ResourceCatalog,
    ttl: Duration,
}

impl RefreshOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        resolver: CollectionResolver,
        store: SharedStore,
        catalog: ResourceCatalog,
        ttl: Duration,
    ) -> Self {
        Self {
            resolver,
            store,
            catalog,
            ttl,
        }
    }

    /// The tracked resources
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// TTL applied to every write
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Refresh one resource unless it is still fresh.
    ///
    /// Upstream failures are reported as `RefreshOutcome::Failed`; only store
    /// errors are returned as `Err`.
    pub async fn refresh_resource(&self, resource: &TrackedResource) -> Result<RefreshOutcome> {
        if self.store.exists(&resource.key).await? {
            debug!("Skipping '{}': cached entry still fresh", resource.key);
            return Ok(RefreshOutcome::Fresh);
        }

        self.populate(resource).await
    }

    /// Refresh a tracked key by name
    pub async fn refresh_key(&self, key: &str) -> Result<RefreshOutcome> {
        let resource = self.tracked(key)?;
        self.refresh_resource(resource).await
    }

    /// Refresh a tracked key even if its entry is still fresh
    pub async fn force_refresh(&self, key: &str) -> Result<RefreshOutcome> {
        let resource = self.tracked(key)?;
        self.populate(resource).await
    }

    /// Refresh every tracked resource concurrently.
    ///
    /// Never fails; per-key problems are logged and recorded in the report.
    pub async fn refresh_all(&self) -> RefreshReport {
        let started_at = Utc::now();

        let futures = self.catalog.iter().map(|resource| async move {
            let outcome = match self.refresh_resource(resource).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Refresh of '{}' aborted: {}", resource.key, e);
                    RefreshOutcome::failed(e.to_string())
                }
            };
            ResourceRefresh {
                key: resource.key.clone(),
                outcome,
            }
        });
        let results = join_all(futures).await;

        let report = RefreshReport {
            started_at,
            finished_at: Utc::now(),
            results,
        };

        info!(
            "Refresh sweep finished: {} written, {} fresh, {} failed",
            report.written(),
            report.fresh(),
            report.failed()
        );

        report
    }

    fn tracked(&self, key: &str) -> Result<&TrackedResource> {
        self.catalog.get(key).ok_or_else(|| Error::not_tracked(key))
    }

    /// Resolve from upstream and write the whole collection
    async fn populate(&self, resource: &TrackedResource) -> Result<RefreshOutcome> {
        let resolved = match self.resolver.resolve(&resource.path).await {
            Ok(resolved) => resolved,
            Err(e) => {
                // Previous entry (if any) is left alone; next sweep retries
                warn!("Could not resolve '{}': {}", resource.key, e);
                return Ok(RefreshOutcome::failed(e.to_string()));
            }
        };

        let blob = encode_entry(&resolved.items)?;
        self.store.set(&resource.key, blob, self.ttl).await?;

        info!(
            "Cached '{}': {} items from {} pages",
            resource.key,
            resolved.items.len(),
            resolved.pages
        );

        Ok(RefreshOutcome::Written {
            items: resolved.items.len(),
            pages: resolved.pages,
        })
    }
}

impl std::fmt::Debug for RefreshOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshOrchestrator")
            .field("resolver", &self.resolver)
            .field("resources", &self.catalog.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
