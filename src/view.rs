//! Views over materialized collections
//!
//! Sorting and truncation applied after a collection is read from the cache.
//! Cached entries themselves are never reordered. Items equal on every sort
//! key keep their cache order.

use crate::types::{Item, SortOrder};
use serde::Deserialize;
use std::cmp::Ordering;

/// Query options for a resource view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewOptions {
    /// Top-level field to sort by
    #[serde(default)]
    pub sort: Option<String>,
    /// Secondary field compared when `sort` ties
    #[serde(default)]
    pub then: Option<String>,
    /// Sort direction, applied to both keys
    #[serde(default)]
    pub order: SortOrder,
    /// Maximum number of items returned
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ViewOptions {
    /// Whether these options change anything
    pub fn is_identity(&self) -> bool {
        self.sort.is_none() && self.limit.is_none()
    }
}

/// Apply sorting and limit to a collection
pub fn apply(mut items: Vec<Item>, options: &ViewOptions) -> Vec<Item> {
    if let Some(field) = options.sort.as_deref() {
        sort_by_fields(&mut items, field, options.then.as_deref(), options.order);
    }

    if let Some(limit) = options.limit {
        items.truncate(limit);
    }

    items
}

/// Stable sort by a top-level field. Items missing the field go last in
/// either direction.
pub fn sort_by_field(items: &mut [Item], field: &str, order: SortOrder) {
    sort_by_fields(items, field, None, order);
}

/// Stable sort by `field`, breaking ties on `then` when given
pub fn sort_by_fields(items: &mut [Item], field: &str, then: Option<&str>, order: SortOrder) {
    items.sort_by(|a, b| {
        let ord = compare_field(a, b, field, order);
        match then {
            Some(then) if ord == Ordering::Equal => compare_field(a, b, then, order),
            _ => ord,
        }
    });
}

/// Missing fields sort after present ones regardless of `order`
fn compare_field(a: &Item, b: &Item, field: &str, order: SortOrder) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numbers numerically, strings lexically, booleans false < true;
/// mixed types fall back to null < bool < number < string < other
fn compare_values(a: &Item, b: &Item) -> Ordering {
    match (a, b) {
        (Item::Number(x), Item::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Item::String(x), Item::String(y)) => x.cmp(y),
        (Item::Bool(x), Item::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Item) -> u8 {
    match value {
        Item::Null => 0,
        Item::Bool(_) => 1,
        Item::Number(_) => 2,
        Item::String(_) => 3,
        Item::Array(_) => 4,
        Item::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn courses() -> Vec<Item> {
        vec![
            json!({"id": 3, "name": "Chemistry"}),
            json!({"id": 1, "name": "Biology"}),
            json!({"name": "Unnumbered"}),
            json!({"id": 2, "name": "Algebra"}),
        ]
    }

    #[test]
    fn test_identity() {
        let options = ViewOptions::default();
        assert!(options.is_identity());
        assert_eq!(apply(courses(), &options), courses());
    }

    #[test]
    fn test_sort_numeric_asc() {
        let options = ViewOptions {
            sort: Some("id".to_string()),
            ..Default::default()
        };
        let ids: Vec<Option<i64>> = apply(courses(), &options)
            .iter()
            .map(|c| c["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn test_sort_desc_keeps_missing_last() {
        let options = ViewOptions {
            sort: Some("id".to_string()),
            order: SortOrder::Desc,
            ..Default::default()
        };
        let ids: Vec<Option<i64>> = apply(courses(), &options)
            .iter()
            .map(|c| c["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![Some(3), Some(2), Some(1), None]);
    }

    #[test]
    fn test_sort_strings() {
        let mut items = courses();
        sort_by_field(&mut items, "name", SortOrder::Asc);
        let names: Vec<&str> = items.iter().filter_map(|c| c["name"].as_str()).collect();
        assert_eq!(names, vec!["Algebra", "Biology", "Chemistry", "Unnumbered"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut items = vec![
            json!({"k": 1, "tag": "a"}),
            json!({"k": 0, "tag": "b"}),
            json!({"k": 1, "tag": "c"}),
        ];
        sort_by_field(&mut items, "k", SortOrder::Asc);
        let tags: Vec<&str> = items.iter().filter_map(|c| c["tag"].as_str()).collect();
        assert_eq!(tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_tie_break_on_secondary_field() {
        let items = vec![
            json!({"term": "fall", "id": 9}),
            json!({"term": "spring", "id": 4}),
            json!({"term": "fall", "id": 2}),
            json!({"term": "fall"}),
        ];
        let options = ViewOptions {
            sort: Some("term".to_string()),
            then: Some("id".to_string()),
            ..Default::default()
        };
        let ids: Vec<Option<i64>> = apply(items.clone(), &options)
            .iter()
            .map(|c| c["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![Some(2), Some(9), None, Some(4)]);

        let options = ViewOptions {
            order: SortOrder::Desc,
            ..options
        };
        let ids: Vec<Option<i64>> = apply(items, &options)
            .iter()
            .map(|c| c["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![Some(4), Some(9), Some(2), None]);
    }

    #[test]
    fn test_limit() {
        let options = ViewOptions {
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(apply(courses(), &options).len(), 2);

        let options = ViewOptions {
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(apply(courses(), &options).len(), 4);
    }

    #[test]
    fn test_mixed_types() {
        let mut items = vec![json!({"v": "x"}), json!({"v": 1}), json!({"v": null})];
        sort_by_field(&mut items, "v", SortOrder::Asc);
        assert_eq!(
            items,
            vec![json!({"v": null}), json!({"v": 1}), json!({"v": "x"})]
        );
    }

    #[test]
    fn test_options_from_query() {
        let options: ViewOptions =
            serde_json::from_value(json!({"sort": "name", "then": "id", "order": "desc", "limit": 5}))
                .unwrap();
        assert_eq!(options.sort.as_deref(), Some("name"));
        assert_eq!(options.then.as_deref(), Some("id"));
        assert_eq!(options.order, SortOrder::Desc);
        assert_eq!(options.limit, Some(5));
    }
}
