//! Helpers over the untyped filter values decoded from a request.

use serde_json::{Map, Value};

use super::predicate::ScalarValue;

/// One filter value: scalar, list of scalars, or a nested date mapping.
pub type FilterValue = Value;

/// Decoded request filters keyed by field name.
pub type RawFilters = Map<String, Value>;

/// `true` for values that carry nothing: null, `false`, zero, `""`, and empty
/// lists or mappings. The string `"0"` is not blank.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Truthiness used by boolean fields and the non-empty gate. Blank values and
/// the string `"0"` are falsey; everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty() && s != "0",
        other => !is_blank(other),
    }
}

/// Scalar view of a value; lists, mappings and null have none.
#[must_use]
pub fn to_scalar(value: &Value) -> Option<ScalarValue> {
    match value {
        Value::Bool(b) => Some(ScalarValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ScalarValue::Int)
            .or_else(|| n.as_f64().map(ScalarValue::Float)),
        Value::String(s) => Some(ScalarValue::Text(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text used as a LIKE needle. Only strings and numbers qualify.
#[must_use]
pub fn to_needle(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsey_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&value), "{value} should be falsey");
        }
    }

    #[test]
    fn test_truthy_values() {
        for value in [json!(true), json!(1), json!(-3), json!("1"), json!("false"), json!("00"), json!(["a"])] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn test_string_zero_is_not_blank() {
        assert!(!is_blank(&json!("0")));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!("")));
    }

    #[test]
    fn test_to_scalar() {
        assert_eq!(to_scalar(&json!("expense")), Some(ScalarValue::Text("expense".into())));
        assert_eq!(to_scalar(&json!(42)), Some(ScalarValue::Int(42)));
        assert_eq!(to_scalar(&json!(12.5)), Some(ScalarValue::Float(12.5)));
        assert_eq!(to_scalar(&json!(true)), Some(ScalarValue::Bool(true)));
        assert_eq!(to_scalar(&json!(["a"])), None);
        assert_eq!(to_scalar(&json!(null)), None);
    }

    #[test]
    fn test_to_needle() {
        assert_eq!(to_needle(&json!("rent")), Some("rent".to_string()));
        assert_eq!(to_needle(&json!(15)), Some("15".to_string()));
        assert_eq!(to_needle(&json!(true)), None);
        assert_eq!(to_needle(&json!({"a": 1})), None);
    }
}
