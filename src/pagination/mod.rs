//! Pagination module
//!
//! Supports cursor pagination driven by the `Link` response header.
//!
//! # Overview
//!
//! Upstream collections are split across pages. Each page carries a `Link`
//! header naming related pages by relation (`next`, `prev`, `first`, `last`).
//! The [`CursorMap`] parsed from that header is the only thing that decides
//! whether another page is fetched: there are no client-side page counters.

mod cursor;

pub use cursor::CursorMap;

/// Name of the pagination header
pub const LINK_HEADER: &str = "link";

#[cfg(test)]
mod tests;
