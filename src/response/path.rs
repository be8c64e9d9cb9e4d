//! Property lookup in parsed response data
//!
//! A path is either a literal top-level key or a dotted path such as
//! `license.details.key`. Numeric segments index into arrays. A `null` value
//! is treated the same as a missing one.

use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
enum PathSeg<'p> {
    Key(&'p str),
    Index(usize),
}

fn parse_path(path: &str) -> impl Iterator<Item = PathSeg<'_>> {
    path.split('.').map(|part| match part.parse::<usize>() {
        Ok(index) => PathSeg::Index(index),
        Err(_) => PathSeg::Key(part),
    })
}

fn step<'a>(current: &'a Value, seg: &PathSeg<'_>) -> Option<&'a Value> {
    match (seg, current) {
        (PathSeg::Key(key), Value::Object(map)) => map.get(*key),
        (PathSeg::Index(index), Value::Object(map)) => map.get(&index.to_string()),
        (PathSeg::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}

/// Look up `path` in `data`.
///
/// An exact top-level key match wins over dotted traversal, so a key that
/// itself contains dots stays reachable.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if let Value::Object(map) = data
        && let Some(value) = map.get(path)
    {
        return non_null(value);
    }

    if !path.contains('.') {
        return match data {
            Value::Array(items) => path
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .and_then(non_null),
            _ => None,
        };
    }

    let mut current = data;
    for seg in parse_path(path) {
        current = step(current, &seg)?;
    }
    non_null(current)
}

fn non_null(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}
