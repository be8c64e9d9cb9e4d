//! Form-encoded response bodies
//!
//! Decodes `key=value&...` text into a JSON object the way a web form
//! submission is read on the server: `a[b]=1` nests, `a[]=1` appends, and
//! dots or spaces in a top-level name become underscores.

use serde_json::{Map, Value};

/// Decode a query string into an object.
pub fn parse_query(body: &str) -> Map<String, Value> {
    let mut root = Map::new();

    for part in body.split('&') {
        if part.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = part.split_once('=').unwrap_or((part, ""));
        let key = decode(raw_key);
        let key = key.trim_start_matches(' ');
        if key.is_empty() {
            continue;
        }

        let (base, segments) = split_key(key);
        if base.is_empty() {
            continue;
        }
        insert(&mut root, base, &segments, Value::String(decode(raw_value)));
    }

    root.into_iter().map(|(key, value)| (key, listify(value))).collect()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

fn normalize_base(base: &str) -> String {
    base.chars()
        .map(|ch| if ch == '.' || ch == ' ' { '_' } else { ch })
        .collect()
}

/// Split `name[a][][b]` into `name` and `[Some("a"), None, Some("b")]`.
fn split_key(key: &str) -> (String, Vec<Option<String>>) {
    let Some(open) = key.find('[') else {
        return (normalize_base(key), Vec::new());
    };

    let (base, mut rest) = key.split_at(open);
    if !rest.contains(']') {
        // An unmatched bracket is part of the name.
        return (normalize_base(&key.replacen('[', "_", 1)), Vec::new());
    }

    let mut segments = Vec::new();
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        let segment = &inner[..close];
        segments.push((!segment.is_empty()).then(|| segment.to_string()));
        rest = &inner[close + 1..];
    }

    (normalize_base(base), segments)
}

fn insert(map: &mut Map<String, Value>, key: String, segments: &[Option<String>], value: Value) {
    let Some((next, rest)) = segments.split_first() else {
        map.insert(key, value);
        return;
    };

    let entry = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(child) = entry {
        let child_key = match next {
            Some(name) => name.clone(),
            None => next_index(child).to_string(),
        };
        insert(child, child_key, rest, value);
    }
}

fn next_index(map: &Map<String, Value>) -> u64 {
    map.keys()
        .filter_map(|key| key.parse::<u64>().ok())
        .max()
        .map_or(0, |max| max + 1)
}

/// Objects keyed exactly `0..n` become arrays.
fn listify(value: Value) -> Value {
    let Value::Object(map) = value else {
        return value;
    };

    let mut map: Map<String, Value> = map
        .into_iter()
        .map(|(key, value)| (key, listify(value)))
        .collect();

    let sequential = !map.is_empty() && (0..map.len()).all(|i| map.contains_key(&i.to_string()));
    if !sequential {
        return Value::Object(map);
    }

    let items = (0..map.len())
        .filter_map(|i| map.remove(&i.to_string()))
        .collect();
    Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: &str) -> Value {
        Value::Object(parse_query(body))
    }

    #[test]
    fn flat_pairs() {
        assert_eq!(
            parse("license_key=LK-1&status=ok"),
            json!({"license_key": "LK-1", "status": "ok"})
        );
    }

    #[test]
    fn values_are_percent_and_plus_decoded() {
        assert_eq!(
            parse("message=Hello+World%21&email=a%40b.com&flag"),
            json!({"message": "Hello World!", "email": "a@b.com", "flag": ""})
        );
    }

    #[test]
    fn brackets_nest_and_append() {
        assert_eq!(
            parse("a[b]=1&a[c][d]=2&list[]=x&list[]=y"),
            json!({"a": {"b": "1", "c": {"d": "2"}}, "list": ["x", "y"]})
        );
    }

    #[test]
    fn explicit_indexes_become_arrays_only_when_sequential() {
        assert_eq!(parse("x[1]=b&x[0]=a"), json!({"x": ["a", "b"]}));
        assert_eq!(parse("y[0]=a&y[5]=b"), json!({"y": {"0": "a", "5": "b"}}));
    }

    #[test]
    fn top_level_dots_and_spaces_become_underscores() {
        assert_eq!(
            parse("first.name=J&last+name=D&meta[a.b]=1"),
            json!({"first_name": "J", "last_name": "D", "meta": {"a.b": "1"}})
        );
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        assert_eq!(parse("a=1&a=2"), json!({"a": "2"}));
    }

    #[test]
    fn unmatched_bracket_is_part_of_the_name() {
        assert_eq!(parse("a[b=1"), json!({"a_b": "1"}));
    }

    #[test]
    fn nameless_pairs_are_skipped() {
        assert_eq!(parse("=1&[x]=2&&ok=1"), json!({"ok": "1"}));
    }
}
