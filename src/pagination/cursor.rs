//! Link header cursor parsing
//!
//! Parses `Link: <https://api.example.com/items?page=2>; rel="next", ...`
//! into a map from relation name to URL. Entries that don't look like
//! `<url>; rel="name"` are skipped and reported, never fatal.

use crate::error::Error;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

/// Regex for one link entry: `<url>; params...`
static LINK_ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^<>\s]+)>\s*;\s*(.+)$").unwrap());

/// Relation name -> URL, derived from one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorMap {
    links: HashMap<String, String>,
}

impl CursorMap {
    /// Create an empty cursor map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a header value, logging any malformed entries
    pub fn parse(header: &str) -> Self {
        let (map, malformed) = Self::parse_reporting(header);
        for entry in malformed {
            warn!("Skipping {}", Error::MalformedCursorEntry { entry });
        }
        map
    }

    /// Parse a header value, returning the malformed entries alongside the map
    pub fn parse_reporting(header: &str) -> (Self, Vec<String>) {
        let mut map = Self::new();
        let mut malformed = Vec::new();

        for entry in split_entries(header) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            match parse_entry(entry) {
                Some((url, rels)) => {
                    // Later entries overwrite earlier ones for the same rel
                    for rel in rels {
                        map.links.insert(rel, url.to_string());
                    }
                }
                None => malformed.push(entry.to_string()),
            }
        }

        (map, malformed)
    }

    /// Parse an optional header; `None` yields an empty map
    pub fn from_header(header: Option<&str>) -> Self {
        header.map(Self::parse).unwrap_or_default()
    }

    /// URL for a relation
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    /// URL of the next page, if any
    pub fn next(&self) -> Option<&str> {
        self.get("next")
    }

    /// Whether a relation is present
    pub fn contains(&self, rel: &str) -> bool {
        self.links.contains_key(rel)
    }

    /// Number of relations
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no relation parsed
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterate over (relation, url) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> HashMap<String, String> {
        self.links
    }
}

impl From<HashMap<String, String>> for CursorMap {
    fn from(links: HashMap<String, String>) -> Self {
        Self { links }
    }
}

/// Split on commas that are not inside `<...>`
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);

    entries
}

/// Parse one entry into its URL and relation names
fn parse_entry(entry: &str) -> Option<(&str, Vec<String>)> {
    let caps = LINK_ENTRY_REGEX.captures(entry)?;
    let url = caps.get(1)?.as_str();
    let params = caps.get(2)?.as_str();

    let rel_value = params.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("rel") {
            Some(value.trim().trim_matches('"').trim_matches('\''))
        } else {
            None
        }
    })?;

    let rels: Vec<String> = rel_value
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();

    if rels.is_empty() {
        return None;
    }

    Some((url, rels))
}
