//! # warmcache
//!
//! A pre-warming cache in front of a paginated, rate-limited REST API.
//!
//! A fixed set of upstream collections is fetched in full (following
//! `Link: <...>; rel="next"` headers) and stored as whole values with a TTL.
//! Reads are served from the store; a miss triggers one targeted refresh.
//!
//! ## Features
//!
//! - **Link-header pagination**: RFC 8288 cursor parsing, sequential page walks
//! - **Whole-collection writes**: partial results are never cached
//! - **Scheduled refresh**: periodic sweeps that skip entries still fresh
//! - **Pluggable stores**: in-memory or Redis
//! - **HTTP API**: cached reads (also at tracked upstream paths), store health, cache admin, manual refresh, passthrough proxy
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use warmcache::{App, AppConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load("warmcache.yaml")?;
//!     let app = App::build(config).await?;
//!
//!     // Populate everything once
//!     let report = app.orchestrator().refresh_all().await;
//!     println!("{} written", report.written());
//!
//!     // Served from the store from now on
//!     let courses = app.service().get_resource("courses").await?;
//!     println!("{} courses", courses.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          HTTP server / CLI          │       Scheduler        │
//! ├─────────────────────────────────────┴────────────────────────┤
//! │   CacheService (read path)  ──miss──▶  RefreshOrchestrator   │
//! ├───────────────────────────┬──────────────────────────────────┤
//! │   CacheStore              │   CollectionResolver             │
//! │   Memory / Redis          │   PageFetcher ─ CursorMap        │
//! └───────────────────────────┴──────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod refresh;
pub mod resolver;
pub mod scheduler;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
pub mod view;

// Re-exports for convenience
pub use app::App;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use pagination::CursorMap;
pub use refresh::{RefreshOrchestrator, RefreshOutcome, RefreshReport};
pub use resolver::{CollectionResolver, ResolvedCollection};
pub use scheduler::Scheduler;
pub use service::CacheService;
pub use store::{CacheStore, MemoryStore, RedisStore, SharedStore};
pub use types::{Item, JsonValue, ResourceCatalog, TrackedResource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
