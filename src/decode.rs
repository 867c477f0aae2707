//! Lenient access to partially-populated API responses.
//!
//! Platform payloads in the wild drop fields freely, so every optional read
//! goes through one of these helpers with a documented default: `0` for
//! counts, `None` for scores, an ordered fallback chain for strings. Only
//! entity identifiers are allowed to stay unresolved (the caller skips the
//! entity).

use serde_json::Value;

/// Returns the first usable value among `keys` on `value`, as a string.
///
/// Numbers coerce to their decimal form; some platforms report internal
/// identifiers as JSON numbers rather than strings. Empty strings and other
/// types are skipped.
pub fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Reads a non-negative count at `key`, treating anything absent, null, or
/// non-numeric as zero.
pub fn count(value: &Value, key: &str) -> u64 {
    value.get(key).map_or(0, coerce_count)
}

/// Coerces a JSON value to a count, defaulting to zero.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Coerces a JSON value to a floating-point score.
///
/// Missing, null, or non-numeric sources yield `None`, never zero and never
/// an error; a score of "no data" must stay distinguishable from 0.0.
pub fn coerce_score(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Walks a path of nested object keys, returning the value at the end.
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |v, k| v.get(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_string_prefers_earlier_keys() {
        let v = json!({"id": "internal", "public_hash_id": "pub"});
        assert_eq!(first_string(&v, &["public_hash_id", "id"]).as_deref(), Some("pub"));
        assert_eq!(first_string(&v, &["missing", "id"]).as_deref(), Some("internal"));
        assert_eq!(first_string(&v, &["missing", "absent"]), None);
    }

    #[test]
    fn first_string_coerces_numeric_values() {
        let v = json!({"id": 17});
        assert_eq!(first_string(&v, &["public_hash_id", "id"]).as_deref(), Some("17"));
    }

    #[test]
    fn first_string_skips_empty_null_and_other_types() {
        let v = json!({"name": "", "title": null, "tags": ["x"], "label": "Checkout"});
        assert_eq!(
            first_string(&v, &["name", "title", "tags", "label"]).as_deref(),
            Some("Checkout")
        );
    }

    #[test]
    fn count_defaults_to_zero() {
        let v = json!({"count": 12, "bad": "x", "nil": null});
        assert_eq!(count(&v, "count"), 12);
        assert_eq!(count(&v, "bad"), 0);
        assert_eq!(count(&v, "nil"), 0);
        assert_eq!(count(&v, "missing"), 0);
    }

    #[test]
    fn count_parses_numeric_strings() {
        let v = json!({"total": "42"});
        assert_eq!(count(&v, "total"), 42);
    }

    #[test]
    fn score_coercion_never_yields_zero_for_missing() {
        assert_eq!(coerce_score(None), None);
        assert_eq!(coerce_score(Some(&json!(null))), None);
        assert_eq!(coerce_score(Some(&json!("n/a"))), None);
        assert_eq!(coerce_score(Some(&json!(4.2))), Some(4.2));
        assert_eq!(coerce_score(Some(&json!(37))), Some(37.0));
        assert_eq!(coerce_score(Some(&json!("4.8"))), Some(4.8));
    }

    #[test]
    fn path_walks_nested_objects() {
        let v = json!({"overall": {"rating": 4.6}});
        assert_eq!(path(&v, &["overall", "rating"]), Some(&json!(4.6)));
        assert_eq!(path(&v, &["overall", "nope"]), None);
        assert_eq!(path(&v, &["nope", "rating"]), None);
    }
}
