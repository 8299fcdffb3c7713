//! Collection resolution
//!
//! Follows `rel="next"` cursors from a starting path until upstream stops
//! supplying one, and returns every record in page order.
//!
//! # Overview
//!
//! Pages are modelled as a lazy, finite stream: each step fetches the URL
//! chosen by the previous page's `Link` header. The stream is materialized
//! eagerly into one [`ResolvedCollection`] before anything is cached, so a
//! failure on any page discards the whole attempt.

use crate::error::{Error, Result};
use crate::http::{build_url, PageResponse, PageSource, PageStatus};
use crate::types::Item;
use futures::stream::{self, Stream, TryStreamExt};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// A fully resolved multi-page collection
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCollection {
    /// All records, page-then-within-page order
    pub items: Vec<Item>,
    /// Number of pages fetched
    pub pages: usize,
}

/// Drives a page source across every page of a collection
#[derive(Clone)]
pub struct CollectionResolver {
    source: Arc<dyn PageSource>,
    base_url: String,
}

impl CollectionResolver {
    /// Create a resolver that resolves paths against `base_url`
    pub fn new(source: Arc<dyn PageSource>, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
        }
    }

    /// Absolute URL of the first page for a path
    pub fn start_url(&self, path: &str) -> String {
        build_url(&self.base_url, path)
    }

    /// Lazy stream of successful pages starting at `start_url`.
    ///
    /// Ends after the first page without a `next` relation. Yields an
    /// `UpstreamUnavailable` error, and then ends, if any page fails.
    pub fn pages(&self, start_url: String) -> impl Stream<Item = Result<PageResponse>> + Send {
        let source = Arc::clone(&self.source);

        stream::try_unfold(Some(start_url), move |next| {
            let source = Arc::clone(&source);
            async move { fetch_step(source.as_ref(), next).await }
        })
    }

    /// Fetch every page of `path` and concatenate the records
    pub async fn resolve(&self, path: &str) -> Result<ResolvedCollection> {
        let start_url = self.start_url(path);
        let mut pages = std::pin::pin!(self.pages(start_url.clone()));

        let mut items = Vec::new();
        let mut count = 0;

        while let Some(page) = pages.try_next().await? {
            count += 1;
            debug!(
                "Page {} of {}: {} items from {}",
                count,
                start_url,
                page.items.len(),
                page.url
            );
            items.extend(page.items);
        }

        Ok(ResolvedCollection {
            items,
            pages: count,
        })
    }
}

impl std::fmt::Debug for CollectionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// One step of the page stream: fetch `next` and find the page after it
async fn fetch_step(
    source: &dyn PageSource,
    next: Option<String>,
) -> Result<Option<(PageResponse, Option<String>)>> {
    let Some(url) = next else {
        return Ok(None);
    };

    let page = source.fetch_page(&url).await;
    if let PageStatus::Failure { reason } = &page.status {
        return Err(Error::upstream(&url, reason.clone()));
    }

    let following = match page.link_header.as_deref() {
        // Single-page resource
        None => None,
        Some(_) => page
            .cursors()
            .next()
            .map(|next| resolve_link(&url, next))
            .transpose()?,
    };

    Ok(Some((page, following)))
}

/// Resolve a possibly relative `next` link against the page it came from
fn resolve_link(current: &str, next: &str) -> Result<String> {
    let base = Url::parse(current)?;
    Ok(base.join(next)?.to_string())
}
