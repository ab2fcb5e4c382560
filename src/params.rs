//! Dynamic parameter sets handed to the carrier clients.
//!
//! Callers describe a shipment as a JSON object keyed by field name, e.g.
//!
//! ```
//! use serde_json::json;
//! let params = shipping_calc::params::from_value(json!({
//!     "api_email": "xmltest@FreightQuote.com",
//!     "api_password": "XML",
//!     "from_zip": 75042,
//!     "to_zip": 33166,
//!     "weight": 5,
//!     "dimensions": "1x1x1",
//! }));
//! assert!(params.is_some());
//! ```
//!
//! Each carrier module turns a `Params` into its typed request, so the helpers
//! here only answer "what kind of value sits under this key".

use serde_json::{Map, Value};

pub type Params = Map<String, Value>;

/// Converts a JSON value into a parameter set. Anything but an object yields `None`.
pub fn from_value(value: Value) -> Option<Params> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Looks a key up, treating an explicit `null` as absent.
pub fn get<'a>(params: &'a Params, key: &str) -> Option<&'a Value> {
    params.get(key).filter(|v| !v.is_null())
}

pub fn get_str<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    get(params, key).and_then(Value::as_str)
}

pub fn get_f64(params: &Params, key: &str) -> Option<f64> {
    get(params, key).and_then(Value::as_f64)
}

/// Renders a scalar the way it would be printed into an XML text node.
/// Strings come through without quotes; objects and arrays are not scalars.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Formats a weight or class value without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(from_value(json!(null)).is_none());
        assert!(from_value(json!([1, 2])).is_none());
        assert_eq!(from_value(json!({})).map(|p| p.len()), Some(0));
    }

    #[test]
    fn test_null_is_absent() {
        let params = from_value(json!({"a": null, "b": "x", "c": 3})).unwrap();
        assert!(get(&params, "a").is_none());
        assert_eq!(get_str(&params, "b"), Some("x"));
        assert_eq!(get_str(&params, "c"), None);
        assert_eq!(get_f64(&params, "c"), Some(3.0));
        assert!(get(&params, "missing").is_none());
    }

    #[test_case(json!("12x3"), Some("12x3"); "string")]
    #[test_case(json!(92.5), Some("92.5"); "float")]
    #[test_case(json!(75042), Some("75042"); "integer")]
    #[test_case(json!(true), Some("true"); "boolean")]
    #[test_case(json!({"k": 1}), None; "object")]
    fn test_scalar_text(value: Value, expected: Option<&str>) {
        assert_eq!(scalar_text(&value).as_deref(), expected);
    }

    #[test_case(34.0, "34")]
    #[test_case(34.5, "34.5")]
    #[test_case(0.0, "0")]
    #[test_case(150.0, "150")]
    fn test_format_number(value: f64, expected: &str) {
        assert_eq!(format_number(value), expected);
    }
}
