//! Single-page fetching
//!
//! Issues one GET and classifies the outcome. A page is either a success
//! (2xx with a decodable body) or a failure; transport errors and non-2xx
//! statuses are both failures and carry no items.

use super::client::HttpClient;
use crate::error::{Error, Result};
use crate::pagination::{CursorMap, LINK_HEADER};
use crate::types::Item;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome classification of a page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// 2xx with a decodable body
    Success,
    Failure {
        /// Status line or transport error, for logs
        reason: String,
    },
}

/// One fetched page
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// URL the page was fetched from
    pub url: String,
    /// Success or failure
    pub status: PageStatus,
    /// Decoded records (always empty on failure)
    pub items: Vec<Item>,
    /// Raw `Link` header value, if present
    pub link_header: Option<String>,
}

impl PageResponse {
    /// Create a successful page
    pub fn success(url: impl Into<String>, items: Vec<Item>, link_header: Option<String>) -> Self {
        Self {
            url: url.into(),
            status: PageStatus::Success,
            items,
            link_header,
        }
    }

    /// Create a failed page
    pub fn failure(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: PageStatus::Failure {
                reason: reason.into(),
            },
            items: Vec::new(),
            link_header: None,
        }
    }

    /// Check if the fetch succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.status, PageStatus::Success)
    }

    /// Parse this page's `Link` header
    pub fn cursors(&self) -> CursorMap {
        CursorMap::from_header(self.link_header.as_deref())
    }
}

/// Something that can fetch one page by absolute URL
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch and classify one page
    async fn fetch_page(&self, url: &str) -> PageResponse;
}

/// Page source backed by the shared upstream client
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Arc<HttpClient>,
}

impl PageFetcher {
    /// Create a fetcher over a shared client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, url: &str) -> PageResponse {
        let response = match self.client.get(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Page fetch failed for {}: {}", url, e);
                return PageResponse::failure(url, e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = Error::http_status(status.as_u16(), truncate(&body, MAX_REASON_BODY));
            warn!("Page fetch for {} failed: {}", url, err);
            return PageResponse::failure(url, err.to_string());
        }

        let link_header = link_header(response.headers());

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read page body from {}: {}", url, e);
                return PageResponse::failure(url, e.to_string());
            }
        };

        match decode_items(&body) {
            Ok(items) => {
                debug!(
                    "Fetched {} items from {} (paginated: {})",
                    items.len(),
                    url,
                    link_header.is_some()
                );
                PageResponse::success(url, items, link_header)
            }
            Err(e) => {
                warn!("Failed to decode page body from {}: {}", url, e);
                PageResponse::failure(url, format!("invalid body: {e}"))
            }
        }
    }
}

/// Upstream error bodies are cut to this many characters in failure reasons
const MAX_REASON_BODY: usize = 200;

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Extract the `Link` header as a string.
///
/// Repeated `Link` lines are joined with `", "` into one value.
fn link_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(LINK_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Decode a page body into records.
///
/// Arrays are the record sequence; a lone object is one record; an empty
/// body or `null` is zero records.
pub fn decode_items(body: &[u8]) -> Result<Vec<Item>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let value: Item = serde_json::from_slice(body)?;
    Ok(match value {
        Item::Array(items) => items,
        Item::Null => Vec::new(),
        other => vec![other],
    })
}
