//! HTTP client module
//!
//! Provides the shared upstream client and the page fetcher built on it.
//!
//! # Features
//!
//! - **Pre-authenticated client**: bearer token attached as a default header
//! - **Rate Limiting**: token bucket pacing using governor
//! - **Page classification**: 2xx vs everything else, `Link` header capture

mod client;
mod page;
mod rate_limit;

pub use client::{build_url, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use page::{decode_items, PageFetcher, PageResponse, PageSource, PageStatus};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
