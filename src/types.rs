//! Common types used throughout warmcache
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// One opaque upstream record
pub type Item = JsonValue;

// ============================================================================
// Tracked Resources
// ============================================================================

/// An upstream collection that is pre-warmed on a timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedResource {
    /// Stable cache key
    pub key: String,
    /// Upstream path, relative to the configured base URL
    pub path: String,
}

impl TrackedResource {
    /// Create a new tracked resource
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// The closed set of tracked resources, fixed at startup
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    resources: Arc<[TrackedResource]>,
}

impl ResourceCatalog {
    /// Build a catalog, rejecting empty or duplicate keys
    pub fn new(resources: Vec<TrackedResource>) -> Result<Self> {
        let mut seen = HashSet::new();
        for resource in &resources {
            if resource.key.is_empty() {
                return Err(Error::config("Resource key cannot be empty"));
            }
            if resource.path.is_empty() {
                return Err(Error::config(format!(
                    "Resource '{}' path cannot be empty",
                    resource.key
                )));
            }
            if !seen.insert(resource.key.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate resource key: {}",
                    resource.key
                )));
            }
        }

        Ok(Self {
            resources: resources.into(),
        })
    }

    /// Look up a resource by key
    pub fn get(&self, key: &str) -> Option<&TrackedResource> {
        self.resources.iter().find(|r| r.key == key)
    }

    /// Look up a resource by its upstream route.
    ///
    /// Only the path component is compared; leading and trailing slashes and
    /// any configured query string are ignored.
    pub fn find_by_path(&self, path: &str) -> Option<&TrackedResource> {
        let wanted = route_of(path);
        self.resources.iter().find(|r| route_of(&r.path) == wanted)
    }

    /// Check whether a key is tracked
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over all tracked resources
    pub fn iter(&self) -> impl Iterator<Item = &TrackedResource> {
        self.resources.iter()
    }

    /// Tracked keys in configuration order
    pub fn keys(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.key.as_str()).collect()
    }

    /// Number of tracked resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Path component of a resource path, without surrounding slashes
fn route_of(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].trim_matches('/')
}

// ============================================================================
// Cache Backend
// ============================================================================

/// Which store implementation backs the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process map with per-key expiry
    #[default]
    Memory,
    /// Redis server
    Redis,
}

// ============================================================================
// Sort Order
// ============================================================================

/// Sort direction for item views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}
