//! Fallback for upstream paths
//!
//! A GET on a tracked resource's own path is served from the cache. Any
//! other GET is forwarded verbatim and never touches the cache.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use super::{ApiError, ApiResponse, AppState};
use crate::view::{self, ViewOptions};

/// Headers copied from the upstream response
const PASSTHROUGH_HEADERS: [header::HeaderName; 2] = [header::CONTENT_TYPE, header::LINK];

/// Route a GET on an upstream path to the cache or to upstream
pub(super) async fn passthrough(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(ApiResponse::<()>::error(format!(
                "{method} is not supported for {}",
                uri.path()
            ))),
        )
            .into_response();
    }

    let tracked = state
        .service
        .catalog()
        .find_by_path(uri.path())
        .map(|r| r.key.clone());

    match tracked {
        Some(key) => serve_tracked(&state, &key, &uri).await,
        None => forward(&state, &uri).await,
    }
}

/// Serve a tracked path from the cache as a bare JSON array
///
/// Upstream query parameters such as `per_page` are ignored. View options
/// are honoured.
async fn serve_tracked(state: &AppState, key: &str, uri: &Uri) -> Response {
    let Query(options) = match Query::<ViewOptions>::try_from_uri(uri) {
        Ok(options) => options,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::debug!("Serving tracked path for '{}' from cache", key);
    match state.service.get_resource(key).await {
        Ok(items) => Json(view::apply(items, &options)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Forward the same path and query upstream
async fn forward(state: &AppState, uri: &Uri) -> Response {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    let upstream = match state.client.get(&path).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Proxy request for {} failed: {}", path, e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::<()>::error(format!("Upstream request failed: {e}"))),
            )
                .into_response();
        }
    };

    let status = upstream.status();
    let mut headers = HeaderMap::new();
    for name in PASSTHROUGH_HEADERS {
        for value in upstream.headers().get_all(&name) {
            headers.append(name.clone(), value.clone());
        }
    }

    match upstream.bytes().await {
        Ok(body) => (status, headers, Body::from(body)).into_response(),
        Err(e) => {
            tracing::warn!("Proxy body for {} could not be read: {}", path, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::<()>::error(format!("Upstream body failed: {e}"))),
            )
                .into_response()
        }
    }
}
