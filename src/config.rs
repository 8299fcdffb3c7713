//! Service configuration
//!
//! This module contains the configuration structures loaded from the YAML
//! config file, plus environment overrides and validation.
//!
//! ```yaml
//! upstream:
//!   base_url: https://lms.example.edu
//!   token_env: WARMCACHE_UPSTREAM_TOKEN
//!   timeout_secs: 30
//!   rate_limit:
//!     requests_per_second: 5
//! cache:
//!   backend: redis
//!   redis_url: redis://127.0.0.1:6379/0
//!   ttl_secs: 600
//! refresh:
//!   interval_secs: 300
//! server:
//!   port: 8080
//! resources:
//!   - key: courses
//!     path: /api/v1/courses?per_page=100
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{CacheBackend, ResourceCatalog, TrackedResource};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `upstream.base_url`
pub const ENV_BASE_URL: &str = "WARMCACHE_UPSTREAM_BASE_URL";
/// Environment variable overriding `cache.redis_url`
pub const ENV_REDIS_URL: &str = "WARMCACHE_REDIS_URL";
/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "WARMCACHE_PORT";
/// Default environment variable holding the bearer token
pub const DEFAULT_TOKEN_ENV: &str = "WARMCACHE_UPSTREAM_TOKEN";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream API settings
    pub upstream: UpstreamConfig,

    /// Cache store settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Scheduled refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Tracked resources
    #[serde(default)]
    pub resources: Vec<TrackedResource>,
}

// ============================================================================
// Upstream
// ============================================================================

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL for resource paths
    pub base_url: String,

    /// Inline bearer token (prefer `token_env`)
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Outbound rate limit; omit to disable pacing
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

// ============================================================================
// Cache
// ============================================================================

/// Cache store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Store backend
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis URL (redis backend only)
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Entry time-to-live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

// ============================================================================
// Refresh / Server
// ============================================================================

/// Scheduled refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between sweeps
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    300
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load from a YAML file, apply environment overrides, and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let mut config = Self::parse(&content)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without overrides or validation
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config = Self::parse(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the environment (`lookup` is `std::env::var` in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.upstream.base_url = base_url;
        }
        if let Some(redis_url) = lookup(ENV_REDIS_URL) {
            self.cache.redis_url = Some(redis_url);
        }
        if let Some(port) = lookup(ENV_PORT).and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if self.upstream.token.is_none() {
            self.upstream.token = lookup(&self.upstream.token_env).filter(|t| !t.is_empty());
        }
        if self.upstream.token.is_none() {
            tracing::warn!(
                "No bearer token configured and ${} is unset; upstream requests are unauthenticated",
                self.upstream.token_env
            );
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.upstream.base_url.is_empty() {
            return Err(Error::missing_field("upstream.base_url"));
        }
        url::Url::parse(&self.upstream.base_url)?;

        if self.resources.is_empty() {
            return Err(Error::config("At least one resource must be tracked"));
        }
        // Rejects empty and duplicate keys
        ResourceCatalog::new(self.resources.clone())?;

        if self.cache.ttl_secs == 0 {
            return Err(Error::config("cache.ttl_secs must be greater than zero"));
        }
        if self.refresh.interval_secs == 0 {
            return Err(Error::config(
                "refresh.interval_secs must be greater than zero",
            ));
        }
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_none() {
            return Err(Error::missing_field("cache.redis_url"));
        }

        Ok(())
    }

    /// The tracked resource catalog
    pub fn catalog(&self) -> Result<ResourceCatalog> {
        ResourceCatalog::new(self.resources.clone())
    }

    /// Entry TTL
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Interval between refresh sweeps
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }

    /// Upstream HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.upstream.base_url)
            .timeout(Duration::from_secs(self.upstream.timeout_secs))
            .no_rate_limit();

        if let Some(ref token) = self.upstream.token {
            builder = builder.bearer_token(token);
        }
        if let Some(ref rate_limit) = self.upstream.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        if let Some(ref agent) = self.upstream.user_agent {
            builder = builder.user_agent(agent);
        }

        builder.build()
    }
}
