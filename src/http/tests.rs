//! Tests for the HTTP client module

use super::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .bearer_token("test-token")
        .no_rate_limit()
        .build();
    Arc::new(HttpClient::with_config(config).unwrap())
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_empty());
    assert!(config.bearer_token.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("warmcache/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .bearer_token("secret")
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::new(2, 4))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.bearer_token.as_deref(), Some("secret"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_invalid_header_is_config_error() {
    let config = HttpClientConfig::builder()
        .header("bad header", "value")
        .build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(err.to_string().contains("Invalid header name"));
}

#[test]
fn test_build_url() {
    assert_eq!(
        build_url("https://api.example.com/", "/api/v1/courses"),
        "https://api.example.com/api/v1/courses"
    );
    assert_eq!(
        build_url("https://api.example.com", "api/v1/courses?per_page=50"),
        "https://api.example.com/api/v1/courses?per_page=50"
    );
    assert_eq!(
        build_url("https://api.example.com", "https://other.example.com/x"),
        "https://other.example.com/x"
    );
    assert_eq!(build_url("", "/x"), "/x");
}

#[test]
fn test_http_client_debug_hides_token() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .bearer_token("super-secret")
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("has_token: true"));
    assert!(!debug.contains("super-secret"));
    assert!(client.has_rate_limiter());
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn test_http_client_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/protected"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/api/protected").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_keeps_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/api/items?page=2").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/missing").await.unwrap();
    assert_eq!(response.status(), 404);
}

// ============================================================================
// Page Fetcher
// ============================================================================

#[tokio::test]
async fn test_fetch_page_success_with_link() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/items?page=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!("<{next}>; rel=\"next\"").as_str())
                .set_body_json(json!([{"id": 1}, {"id": 2}])),
        )
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(client_for(&mock_server));
    let url = format!("{}/items", mock_server.uri());
    let page = fetcher.fetch_page(&url).await;

    assert!(page.is_success());
    assert_eq!(page.url, url);
    assert_eq!(page.items, vec![json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(page.cursors().next(), Some(next.as_str()));
}

#[tokio::test]
async fn test_fetch_page_joins_repeated_link_lines() {
    let mock_server = MockServer::start().await;
    let first = format!("{}/items?page=1", mock_server.uri());
    let next = format!("{}/items?page=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Link", format!("<{first}>; rel=\"first\"").as_str())
                .append_header("Link", format!("<{next}>; rel=\"next\"").as_str())
                .set_body_json(json!([{"id": 1}])),
        )
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(client_for(&mock_server));
    let page = fetcher
        .fetch_page(&format!("{}/items", mock_server.uri()))
        .await;

    assert!(page.is_success());
    let cursors = page.cursors();
    assert_eq!(cursors.get("first"), Some(first.as_str()));
    assert_eq!(cursors.next(), Some(next.as_str()));
}

#[tokio::test]
async fn test_fetch_page_without_link() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(client_for(&mock_server));
    let page = fetcher
        .fetch_page(&format!("{}/items", mock_server.uri()))
        .await;

    assert!(page.is_success());
    assert!(page.link_header.is_none());
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_fetch_page_non_2xx_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("Link", "<https://x/2>; rel=\"next\"")
                .set_body_json(json!([{"id": 1}])),
        )
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(client_for(&mock_server));
    let page = fetcher
        .fetch_page(&format!("{}/items", mock_server.uri()))
        .await;

    assert_eq!(
        page.status,
        PageStatus::Failure {
            reason: r#"HTTP 503: [{"id":1}]"#.to_string()
        }
    );
    assert!(page.items.is_empty());
    assert!(page.link_header.is_none());
}

#[tokio::test]
async fn test_fetch_page_transport_error_is_failure() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_millis(500))
        .no_rate_limit()
        .build();
    let fetcher = PageFetcher::new(Arc::new(HttpClient::with_config(config).unwrap()));

    let page = fetcher.fetch_page("http://127.0.0.1:1/items").await;
    assert!(!page.is_success());
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_fetch_page_invalid_body_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::new(client_for(&mock_server));
    let page = fetcher
        .fetch_page(&format!("{}/items", mock_server.uri()))
        .await;

    assert!(!page.is_success());
}

// ============================================================================
// Body Decoding
// ============================================================================

#[test]
fn test_decode_items_shapes() {
    assert_eq!(
        decode_items(br#"[{"id":1},{"id":2}]"#).unwrap(),
        vec![json!({"id": 1}), json!({"id": 2})]
    );
    assert_eq!(
        decode_items(br#"{"id":1}"#).unwrap(),
        vec![json!({"id": 1})]
    );
    assert!(decode_items(b"null").unwrap().is_empty());
    assert!(decode_items(b"").unwrap().is_empty());
    assert!(decode_items(b"  \n").unwrap().is_empty());
    assert!(decode_items(b"[]").unwrap().is_empty());
    assert!(decode_items(b"{not json").is_err());
}
