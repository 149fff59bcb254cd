//! Null-safe lookups into API records
//!
//! Every helper here resolves a missing key, a `null`, or a value of the wrong shape to
//! `None` (or an empty collection). Extractors never see an error for absent data.

use serde_json::Value;
use std::collections::BTreeMap;

/// Walk a path of object keys, returning `None` as soon as a step is missing
pub fn get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Same as [`get`] but starting from an optional record
pub fn opt_get<'a>(value: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    value.and_then(|v| get(v, path))
}

pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    get(value, path).and_then(Value::as_str)
}

pub fn i64_at(value: &Value, path: &[&str]) -> Option<i64> {
    get(value, path).and_then(Value::as_i64)
}

pub fn bool_at(value: &Value, path: &[&str]) -> Option<bool> {
    get(value, path).and_then(Value::as_bool)
}

/// Array at `path`, or an empty slice
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    get(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Display text of a list element: the string itself, or a reference object's `name`
fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Join list elements with `sep`, skipping elements with no displayable text
pub fn join_items(items: &[Value], sep: &str) -> String {
    items
        .iter()
        .filter_map(item_text)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Join a multi-line text field (`desc`, `higher_level`) with newlines
pub fn join_lines(value: &Value, path: &[&str]) -> String {
    join_items(array_at(value, path), "\n")
}

/// Join the names of a list of references with ", "
pub fn join_names(value: &Value, path: &[&str]) -> String {
    join_items(array_at(value, path), ", ")
}

/// The `index` of every reference object in a list
pub fn indices(value: &Value, path: &[&str]) -> Vec<String> {
    array_at(value, path)
        .iter()
        .filter_map(|item| str_at(item, &["index"]).map(str::to_string))
        .collect()
}

/// Parse a level-keyed object such as `{"1": "1d6", "5": "2d6"}` into an ordered map.
///
/// Keys that are not non-negative integers are dropped, and so are `null` and blank string
/// values: a level with nothing to say does not interrupt a forward fill.
pub fn level_map(value: Option<&Value>) -> BTreeMap<u32, Value> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter(|(_, v)| !v.is_null() && !v.as_str().is_some_and(|s| s.trim().is_empty()))
                .filter_map(|(k, v)| k.trim().parse::<u32>().ok().map(|level| (level, v.clone())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_resolve_to_none() {
        let record = json!({"damage": {"damage_type": {"name": "Fire"}}, "material": null});

        assert_eq!(str_at(&record, &["damage", "damage_type", "name"]), Some("Fire"));
        assert_eq!(str_at(&record, &["damage", "missing", "name"]), None);
        assert_eq!(get(&record, &["material"]), None);
        assert_eq!(str_at(&record, &["damage", "damage_type", "name", "deeper"]), None);
        assert!(array_at(&record, &["classes"]).is_empty());
    }

    #[test]
    fn test_joins() {
        let record = json!({
            "desc": ["First line.", "Second line."],
            "languages": [
                {"index": "common", "name": "Common"},
                {"index": "elvish", "name": "Elvish"}
            ]
        });

        assert_eq!(join_lines(&record, &["desc"]), "First line.\nSecond line.");
        assert_eq!(join_names(&record, &["languages"]), "Common, Elvish");
        assert_eq!(indices(&record, &["languages"]), vec!["common", "elvish"]);
        assert_eq!(join_names(&record, &["traits"]), "");
    }

    #[test]
    fn test_level_map_orders_numeric_keys() {
        let damage = json!({"11": "3d10", "5": "2d10", "1": "1d10", "bogus": "x"});
        let map = level_map(Some(&damage));

        let keys: Vec<u32> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 5, 11]);
        assert!(level_map(None).is_empty());
    }

    #[test]
    fn test_level_map_skips_blank_values() {
        let damage = json!({"1": "1d10", "5": "", "7": "  ", "9": null, "11": "2d10"});
        let keys: Vec<u32> = level_map(Some(&damage)).keys().copied().collect();
        assert_eq!(keys, vec![1, 11]);
    }
}
