//! Query string decoding, the inverse of [`encode`](crate::query::encode).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::query::QueryError;

/// Deepest bracket nesting accepted in one key (`a[b][c]` has depth 2).
pub const MAX_DEPTH: usize = 32;

/// Decode `?a[b]=1&ids[0]=x` into a JSON object tree.
///
/// Every leaf decodes as a string; the wire format carries no types.
/// A container whose keys are exactly `0..n` becomes an array, `k[]=v`
/// appends, and a repeated plain key keeps the last value.
///
/// Keys nested deeper than [`MAX_DEPTH`] are rejected with
/// [`QueryError::TooDeep`].
pub fn decode(input: &str) -> Result<Value, QueryError> {
    let input = input.strip_prefix('?').unwrap_or(input);

    let mut root = Map::new();
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let path = parse_key(raw_key)?;
        let value = decode_component(raw_value)?;
        insert(&mut root, &path, value, raw_key)?;
    }

    Ok(Value::Object(
        root.into_iter()
            .map(|(k, v)| (k, arrays_from_indices(v)))
            .collect(),
    ))
}

/// Decode and deserialize in one step.
pub fn decode_into<T: DeserializeOwned>(input: &str) -> Result<T, QueryError> {
    let value = decode(input)?;
    serde_json::from_value(value).map_err(QueryError::Deserialize)
}

/// Split `a[b][0]` into `["a", "b", "0"]`, decoding each component.
fn parse_key(raw: &str) -> Result<Vec<String>, QueryError> {
    let malformed = || QueryError::MalformedKey(raw.to_string());

    let (base, mut rest) = match raw.find('[') {
        Some(i) => (&raw[..i], &raw[i..]),
        None => (raw, ""),
    };
    if base.is_empty() || base.contains(']') {
        return Err(malformed());
    }

    let mut path = vec![decode_component(base)?];
    while !rest.is_empty() {
        if path.len() > MAX_DEPTH {
            return Err(QueryError::TooDeep {
                key: base.to_string(),
                limit: MAX_DEPTH,
            });
        }
        let inner = rest.strip_prefix('[').ok_or_else(malformed)?;
        let close = inner.find(']').ok_or_else(malformed)?;
        let segment = &inner[..close];
        if segment.contains('[') {
            return Err(malformed());
        }
        path.push(decode_component(segment)?);
        rest = &inner[close + 1..];
    }
    Ok(path)
}

fn decode_component(raw: &str) -> Result<String, QueryError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .map_err(|_| QueryError::InvalidEncoding(raw.to_string()))
}

fn insert(
    map: &mut Map<String, Value>,
    path: &[String],
    value: String,
    raw_key: &str,
) -> Result<(), QueryError> {
    let Some((head, rest)) = path.split_first() else {
        return Err(QueryError::MalformedKey(raw_key.to_string()));
    };
    // `k[]` appends after the highest index already present
    let head = if head.is_empty() {
        next_index(map).to_string()
    } else {
        head.clone()
    };

    if rest.is_empty() {
        if let Some(Value::Object(_)) = map.get(&head) {
            return Err(QueryError::Conflict(raw_key.to_string()));
        }
        map.insert(head, Value::String(value));
        return Ok(());
    }

    match map
        .entry(head)
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(inner) => insert(inner, rest, value, raw_key),
        _ => Err(QueryError::Conflict(raw_key.to_string())),
    }
}

fn next_index(map: &Map<String, Value>) -> usize {
    map.keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .map_or(0, |i| i + 1)
}

fn arrays_from_indices(value: Value) -> Value {
    let map = match value {
        Value::Object(map) => map,
        other => return other,
    };
    let map: Map<String, Value> = map
        .into_iter()
        .map(|(k, v)| (k, arrays_from_indices(v)))
        .collect();

    if map.is_empty() || !is_dense_index(&map) {
        return Value::Object(map);
    }

    let mut items: Vec<(usize, Value)> = map
        .into_iter()
        .filter_map(|(k, v)| k.parse().ok().map(|i| (i, v)))
        .collect();
    items.sort_by_key(|(i, _)| *i);
    Value::Array(items.into_iter().map(|(_, v)| v).collect())
}

/// Keys are exactly the canonical decimals `0..len`.
fn is_dense_index(map: &Map<String, Value>) -> bool {
    let mut seen = vec![false; map.len()];
    for key in map.keys() {
        match key.parse::<usize>() {
            Ok(i) if i < seen.len() && i.to_string() == *key => seen[i] = true,
            _ => return false,
        }
    }
    seen.into_iter().all(|s| s)
}
