//! Decoding of request query strings into [`RawFilters`].
//!
//! Two encodings are understood:
//!
//! ```text
//! // Bracket notation
//! GET /transactions?description=groceries&date=after:2024-01-01
//! GET /transactions?type[]=debt&type[]=gifts
//! GET /transactions?date[start]=2024-01-01&date[end]=2024-02-08
//! GET /transactions?date[after]=2024-01-01&date[before]=2024-02-08
//!
//! // React Admin style JSON-encoded `filter` parameter
//! GET /transactions?filter={"description":"rent","type":["debt","gifts"]}
//! ```

use serde_json::{Map, Value};
use url::form_urlencoded;

use super::value::RawFilters;

/// Query parameter carrying JSON-encoded filters
pub const FILTER_PARAM: &str = "filter";

/// Decodes a query string in bracket notation.
///
/// `key[]` collects into a list, `key[sub]` into a mapping. A repeated plain
/// key keeps its last value. Deeper nesting is not interpreted and the key is
/// kept verbatim.
#[must_use]
pub fn parse_query_string(query: &str) -> RawFilters {
    let mut filters = RawFilters::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        insert_pair(&mut filters, &key, value.into_owned());
    }
    filters
}

/// Decodes the JSON-encoded `filter` parameter. Anything other than a JSON
/// object yields no filters.
#[must_use]
pub fn parse_filter_json(filter_str: Option<&str>) -> RawFilters {
    let Some(filter) = filter_str else {
        return RawFilters::new();
    };
    match serde_json::from_str::<Value>(filter) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "Filter parameter is not a JSON object");
            RawFilters::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid JSON in filter parameter");
            RawFilters::new()
        }
    }
}

/// Decodes a raw query string, preferring the JSON `filter` parameter when
/// present.
#[must_use]
pub fn decode_filters(query: &str) -> RawFilters {
    let mut filters = parse_query_string(query);
    match filters.remove(FILTER_PARAM) {
        Some(Value::String(json)) => parse_filter_json(Some(&json)),
        Some(other) => {
            filters.insert(FILTER_PARAM.to_string(), other);
            filters
        }
        None => filters,
    }
}

fn insert_pair(filters: &mut RawFilters, key: &str, value: String) {
    let Some((base, sub)) = split_brackets(key) else {
        filters.insert(key.to_string(), Value::String(value));
        return;
    };

    let entry = filters.entry(base.to_string());
    if sub.is_empty() {
        let slot = entry.or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(Value::String(value)),
            other => *other = Value::Array(vec![Value::String(value)]),
        }
    } else {
        let slot = entry.or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            map.insert(sub.to_string(), Value::String(value));
        }
    }
}

/// `"date[start]"` -> `("date", "start")`, `"type[]"` -> `("type", "")`
fn split_brackets(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let inner = key[open + 1..].strip_suffix(']')?;
    if open == 0 || inner.contains(['[', ']']) {
        return None;
    }
    Some((&key[..open], inner))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
