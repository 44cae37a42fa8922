//! Query string encoding.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::query::QueryError;

/// Encode a query object into `?k=v&…`, or `""` when nothing is left.
///
/// `Null` stands for an absent value and is omitted at every depth.
/// Nested objects use `a[b]=v`, arrays use `k[0]=v0&k[1]=v1`.
pub fn encode(query: &Value) -> Result<String, QueryError> {
    let object = match query {
        Value::Null => return Ok(String::new()),
        Value::Object(object) => object,
        other => return Err(QueryError::NotAnObject(kind_name(other))),
    };

    let mut pairs = Vec::new();
    for (key, value) in object {
        tokenise(urlencoding::encode(key).into_owned(), value, &mut pairs);
    }

    if pairs.is_empty() {
        return Ok(String::new());
    }

    let mut out = String::from("?");
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    Ok(out)
}

/// Encode any serializable value; `None` fields are omitted.
pub fn encode_serialize<T: Serialize + ?Sized>(query: &T) -> Result<String, QueryError> {
    let value = serde_json::to_value(query).map_err(QueryError::Serialize)?;
    encode(&value)
}

/// Flatten one value under an already-encoded key.
fn tokenise(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, number_text(n))),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                tokenise(format!("{}[{}]", key, index), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                tokenise(
                    format!("{}[{}]", key, urlencoding::encode(field)),
                    item,
                    pairs,
                );
            }
        }
    }
}

/// Numbers print as JSON text does: a whole float has no fraction (`1.0` → `1`).
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_param() {
        assert_eq!(encode(&json!({ "take": "10" })).unwrap(), "?take=10");
    }

    #[test]
    fn test_absent_values_omitted() {
        assert_eq!(
            encode(&json!({ "take": "10", "skip": null })).unwrap(),
            "?take=10"
        );
        assert_eq!(encode(&json!({ "a": null, "b": null })).unwrap(), "");
        assert_eq!(encode(&json!({})).unwrap(), "");
        assert_eq!(encode(&Value::Null).unwrap(), "");
    }

    #[test]
    fn test_nested_object() {
        assert_eq!(encode(&json!({ "a": { "b": 1 } })).unwrap(), "?a[b]=1");
        assert_eq!(
            encode(&json!({ "a": { "b": { "c": true } } })).unwrap(),
            "?a[b][c]=true"
        );
    }

    #[test]
    fn test_array_indices() {
        assert_eq!(
            encode(&json!({ "ids": [1, 2] })).unwrap(),
            "?ids[0]=1&ids[1]=2"
        );
        // Holes keep their position
        assert_eq!(
            encode(&json!({ "ids": [1, null, 3] })).unwrap(),
            "?ids[0]=1&ids[2]=3"
        );
        assert_eq!(
            encode(&json!({ "f": [{ "x": "a" }] })).unwrap(),
            "?f[0][x]=a"
        );
    }

    #[test]
    fn test_number_text() {
        assert_eq!(
            encode(&json!({ "a": 1.0, "b": 1.5, "c": -2.0, "d": -0.0, "e": 7 })).unwrap(),
            "?a=1&b=1.5&c=-2&d=0&e=7"
        );
        assert_eq!(encode(&json!({ "big": 1e20 })).unwrap(), "?big=100000000000000000000");
    }

    #[test]
    fn test_insertion_order_kept() {
        assert_eq!(
            encode(&json!({ "z": 1, "a": 2, "m": 3 })).unwrap(),
            "?z=1&a=2&m=3"
        );
    }

    #[test]
    fn test_percent_encoding() {
        assert_eq!(
            encode(&json!({ "search": "a b&c=d" })).unwrap(),
            "?search=a%20b%26c%3Dd"
        );
        assert_eq!(
            encode(&json!({ "na me": { "k&y": "é" } })).unwrap(),
            "?na%20me[k%26y]=%C3%A9"
        );
    }

    #[test]
    fn test_scalars_stringified() {
        assert_eq!(
            encode(&json!({ "n": 1.5, "flag": false, "neg": -3 })).unwrap(),
            "?n=1.5&flag=false&neg=-3"
        );
    }

    #[test]
    fn test_non_object_rejected() {
        let err = encode(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, QueryError::NotAnObject("array")));
    }

    #[test]
    fn test_deterministic() {
        let q = json!({ "take": "10", "filter": { "tags": ["a", "b"] } });
        assert_eq!(encode(&q).unwrap(), encode(&q).unwrap());
    }

    #[test]
    fn test_encode_serialize_skips_none() {
        #[derive(Serialize)]
        struct Page {
            take: Option<u32>,
            skip: Option<u32>,
        }

        let query = Page {
            take: Some(10),
            skip: None,
        };
        assert_eq!(encode_serialize(&query).unwrap(), "?take=10");
    }
}
