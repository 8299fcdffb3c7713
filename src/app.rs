//! Application wiring
//!
//! Builds every collaborator from an [`AppConfig`] and owns their lifetime:
//! one shared HTTP client, one store, one orchestrator, and the scheduler
//! while serving.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, PageFetcher};
use crate::refresh::RefreshOrchestrator;
use crate::resolver::CollectionResolver;
use crate::scheduler::Scheduler;
use crate::server::{self, AppState};
use crate::service::CacheService;
use crate::store::{MemoryStore, RedisStore, SharedStore};
use crate::types::CacheBackend;
use axum::Router;
use std::sync::Arc;
use tracing::info;

/// A fully wired service
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    client: Arc<HttpClient>,
    service: CacheService,
}

impl App {
    /// Build from configuration, connecting to the configured store
    pub async fn build(config: AppConfig) -> Result<Self> {
        let store = connect_store(&config).await?;
        Self::with_store(config, store)
    }

    /// Build with an explicit store
    pub fn with_store(config: AppConfig, store: SharedStore) -> Result<Self> {
        let catalog = config.catalog()?;
        let client = Arc::new(HttpClient::with_config(config.http_client_config())?);
        let fetcher = Arc::new(PageFetcher::new(Arc::clone(&client)));
        let resolver = CollectionResolver::new(fetcher, &config.upstream.base_url);
        let orchestrator = Arc::new(RefreshOrchestrator::new(
            resolver,
            Arc::clone(&store),
            catalog,
            config.ttl(),
        ));

        Ok(Self {
            config,
            client,
            service: CacheService::new(store, orchestrator),
        })
    }

    /// The loaded configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The read path
    pub fn service(&self) -> &CacheService {
        &self.service
    }

    /// The refresh orchestrator
    pub fn orchestrator(&self) -> &Arc<RefreshOrchestrator> {
        self.service.orchestrator()
    }

    /// HTTP router over this app
    pub fn router(&self) -> Router {
        server::router(AppState::new(self.service.clone(), Arc::clone(&self.client)))
    }

    /// Start the scheduler and serve HTTP until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let scheduler = Scheduler::spawn(
            Arc::clone(self.orchestrator()),
            self.config.refresh_interval(),
        );

        let result = server::serve(self.router(), self.config.server.port, shutdown_signal()).await;

        info!("Shutting down");
        scheduler.shutdown().await;
        result
    }
}

/// Connect the configured store backend
pub async fn connect_store(config: &AppConfig) -> Result<SharedStore> {
    match config.cache.backend {
        CacheBackend::Memory => {
            info!("Using in-memory cache store");
            Ok(Arc::new(MemoryStore::new()))
        }
        CacheBackend::Redis => {
            let url = config
                .cache
                .redis_url
                .as_deref()
                .ok_or_else(|| Error::missing_field("cache.redis_url"))?;
            info!("Using redis cache store");
            Ok(Arc::new(RedisStore::connect(url).await?))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> AppConfig {
        AppConfig::from_yaml_str(&format!(
            "upstream:\n  base_url: {base_url}\n  token: secret\nresources:\n  - key: courses\n    path: /api/courses\n"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_memory_app() {
        let app = App::build(config("http://127.0.0.1:1")).await.unwrap();
        assert_eq!(app.service().catalog().keys(), vec!["courses"]);
        assert_eq!(app.orchestrator().ttl(), app.config().ttl());
    }

    #[tokio::test]
    async fn test_router_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .and(wiremock::matchers::header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let app = App::with_store(config(&server.uri()), Arc::new(MemoryStore::new())).unwrap();
        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .uri("/resources/courses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["data"], json!([{"id": 1}]));
    }
}
