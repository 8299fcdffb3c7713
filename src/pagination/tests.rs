//! Tests for pagination module

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use test_case::test_case;

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Basic Parsing
// ============================================================================

#[test]
fn test_parse_next_and_prev() {
    let cursors = CursorMap::parse(r#"<https://x/2>; rel="next", <https://x/1>; rel="prev""#);

    assert_eq!(
        cursors.into_inner(),
        map(&[("next", "https://x/2"), ("prev", "https://x/1")])
    );
}

#[test]
fn test_parse_all_relations() {
    let header = concat!(
        r#"<https://api.example.com/items?page=3&per_page=10>; rel="next", "#,
        r#"<https://api.example.com/items?page=1&per_page=10>; rel="prev", "#,
        r#"<https://api.example.com/items?page=1&per_page=10>; rel="first", "#,
        r#"<https://api.example.com/items?page=9&per_page=10>; rel="last""#
    );
    let cursors = CursorMap::parse(header);

    assert_eq!(cursors.len(), 4);
    assert_eq!(
        cursors.next(),
        Some("https://api.example.com/items?page=3&per_page=10")
    );
    assert_eq!(
        cursors.get("last"),
        Some("https://api.example.com/items?page=9&per_page=10")
    );
}

#[test_case("" ; "empty")]
#[test_case("   " ; "whitespace only")]
#[test_case(" , ,," ; "only separators")]
fn test_parse_empty_header(header: &str) {
    let (cursors, malformed) = CursorMap::parse_reporting(header);
    assert!(cursors.is_empty());
    assert!(malformed.is_empty());
}

#[test]
fn test_from_absent_header() {
    assert!(CursorMap::from_header(None).is_empty());
    assert_eq!(
        CursorMap::from_header(Some(r#"<https://x/2>; rel="next""#)).next(),
        Some("https://x/2")
    );
}

// ============================================================================
// Whitespace Tolerance
// ============================================================================

#[test_case(r#"<https://x/2>;rel="next""# ; "no space")]
#[test_case(r#"<https://x/2>   ;   rel="next""# ; "spaces around semicolon")]
#[test_case(r#"  <https://x/2>; rel = "next"  "# ; "padded entry")]
#[test_case("<https://x/2>;\trel=\"next\"" ; "tab")]
#[test_case("<https://x/2>; rel=next" ; "unquoted rel")]
fn test_parse_tolerates_whitespace(header: &str) {
    let cursors = CursorMap::parse(header);
    assert_eq!(cursors.next(), Some("https://x/2"));
}

#[test]
fn test_parse_whitespace_after_commas() {
    let cursors =
        CursorMap::parse("<https://x/2>; rel=\"next\",\n\t   <https://x/9>; rel=\"last\"");
    assert_eq!(cursors.len(), 2);
    assert_eq!(cursors.get("last"), Some("https://x/9"));
}

// ============================================================================
// Malformed Entries
// ============================================================================

#[test]
fn test_malformed_entries_are_skipped() {
    let header = concat!(
        r#"https://x/0; rel="first", "#,
        r#"<https://x/2>; rel="next", "#,
        r#"<https://x/1>, "#,
        r#"<https://x/9>; type="text/html", "#,
        r#"<https://x/9>; rel="last""#
    );
    let (cursors, malformed) = CursorMap::parse_reporting(header);

    assert_eq!(
        cursors.into_inner(),
        map(&[("next", "https://x/2"), ("last", "https://x/9")])
    );
    assert_eq!(
        malformed,
        vec![
            r#"https://x/0; rel="first""#.to_string(),
            "<https://x/1>".to_string(),
            r#"<https://x/9>; type="text/html""#.to_string(),
        ]
    );
}

#[test]
fn test_malformed_first_entry_does_not_abort() {
    let cursors = CursorMap::parse(r#"garbage, <https://x/2>; rel="next""#);
    assert_eq!(cursors.next(), Some("https://x/2"));
}

#[test]
fn test_empty_rel_is_malformed() {
    let (cursors, malformed) = CursorMap::parse_reporting(r#"<https://x/2>; rel="""#);
    assert!(cursors.is_empty());
    assert_eq!(malformed.len(), 1);
}

// ============================================================================
// Relation Semantics
// ============================================================================

#[test]
fn test_duplicate_relation_last_wins() {
    let cursors = CursorMap::parse(r#"<https://x/2>; rel="next", <https://x/3>; rel="next""#);
    assert_eq!(cursors.len(), 1);
    assert_eq!(cursors.next(), Some("https://x/3"));
}

#[test]
fn test_multiple_relations_in_one_entry() {
    let cursors = CursorMap::parse(r#"<https://x/5>; rel="next last""#);
    assert_eq!(cursors.next(), Some("https://x/5"));
    assert_eq!(cursors.get("last"), Some("https://x/5"));
}

#[test]
fn test_relation_names_are_case_insensitive() {
    let cursors = CursorMap::parse(r#"<https://x/2>; REL="Next""#);
    assert_eq!(cursors.next(), Some("https://x/2"));
}

#[test]
fn test_extra_params_are_ignored() {
    let cursors =
        CursorMap::parse(r#"<https://x/2>; title="page two"; rel="next"; type="application/json""#);
    assert_eq!(cursors.next(), Some("https://x/2"));
}

#[test]
fn test_commas_inside_url_are_kept() {
    let cursors = CursorMap::parse(r#"<https://x/items?ids=1,2,3&page=2>; rel="next""#);
    assert_eq!(cursors.next(), Some("https://x/items?ids=1,2,3&page=2"));
}

#[test]
fn test_no_next_relation() {
    let cursors = CursorMap::parse(r#"<https://x/1>; rel="prev", <https://x/1>; rel="first""#);
    assert!(cursors.next().is_none());
    assert!(cursors.contains("prev"));
    assert!(cursors.contains("first"));
}
