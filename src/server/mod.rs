//! HTTP server for cached resource access
//!
//! Tracked resources are served from the cache both under `/resources/:key`
//! and at their own upstream path. Any other GET is proxied upstream.

mod proxy;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::refresh::ResourceRefresh;
use crate::service::CacheService;
use crate::types::{Item, TrackedResource};
use crate::view::{self, ViewOptions};

/// State shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Read path and cache administration
    pub service: CacheService,
    /// Shared upstream client, used by the passthrough proxy
    pub client: Arc<HttpClient>,
}

impl AppState {
    /// Create handler state
    pub fn new(service: CacheService, client: Arc<HttpClient>) -> Self {
        Self { service, client }
    }
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Crate error rendered as an API response
#[derive(Debug)]
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

/// HTTP status for a crate error
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::ResourceNotTracked { .. } => StatusCode::NOT_FOUND,
        Error::CacheMissAfterRefresh { .. } | Error::StoreUnavailable { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        Error::UpstreamUnavailable { .. } | Error::Http(_) | Error::HttpStatus { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self.0);
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

/// Build the router
pub fn router(state: AppState) -> Router {
    // Allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/resources", get(list_resources))
        .route("/resources/:key", get(get_resource))
        .route("/cache/keys", get(list_cache_keys))
        .route("/cache", delete(clear_cache))
        .route("/cache/:key", delete(invalidate_key))
        .route("/refresh", post(refresh_all))
        .route("/refresh/:key", post(refresh_key))
        .fallback(proxy::passthrough)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on `port` until `shutdown` resolves
pub async fn serve<F>(router: Router, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::server(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint; reports the store as unreachable with 503
async fn health(State(state): State<AppState>) -> Response {
    match state.service.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Tracked keys and their upstream paths
async fn list_resources(State(state): State<AppState>) -> impl IntoResponse {
    let resources: Vec<TrackedResource> = state.service.catalog().iter().cloned().collect();
    Json(ApiResponse::success(resources))
}

/// Read a tracked resource, refreshing it on a miss
async fn get_resource(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(options): Query<ViewOptions>,
) -> ApiResult<Vec<Item>> {
    let items = state.service.get_resource(&key).await?;
    Ok(Json(ApiResponse::success(view::apply(items, &options))))
}

async fn list_cache_keys(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let keys = state.service.list_keys().await?;
    Ok(Json(ApiResponse::success(keys)))
}

async fn clear_cache(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    state.service.clear_all().await?;
    tracing::info!("Cache cleared");
    Ok(Json(ApiResponse::success(json!({ "cleared": true }))))
}

async fn invalidate_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<serde_json::Value> {
    let deleted = state.service.invalidate(&key).await?;
    Ok(Json(ApiResponse::success(
        json!({ "key": key, "deleted": deleted }),
    )))
}

/// Run a full sweep and return its report
async fn refresh_all(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.service.orchestrator().refresh_all().await;
    Json(ApiResponse::success(report))
}

/// Force a refresh of one tracked key
async fn refresh_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ResourceRefresh> {
    let outcome = state.service.orchestrator().force_refresh(&key).await?;
    Ok(Json(ApiResponse::success(ResourceRefresh { key, outcome })))
}
