//! Dot-path writes into JSON values.

use serde_json::{Map, Value};

use crate::{BuilderError, BuilderResult};

/// Set `value` at a dot-separated `path` inside `target`.
///
/// Missing intermediate objects are created; intermediate non-object values
/// are replaced by objects.
///
/// # Errors
///
/// Returns [`BuilderError::InvalidPath`] if the path is empty or contains an
/// empty segment.
pub fn set_path(target: &mut Value, path: &str, value: Value) -> BuilderResult<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(BuilderError::InvalidPath(path.to_string()));
    }

    make_object(target);
    if let Value::Object(map) = target {
        set_segments(map, &segments, value);
    }
    Ok(())
}

fn set_segments(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let child = map.entry((*head).to_string()).or_insert(Value::Null);
            make_object(child);
            if let Value::Object(child) = child {
                set_segments(child, rest, value);
            }
        }
    }
}

fn make_object(value: &mut Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
}

/// Set `value` at `path` inside a JSON object map.
///
/// # Errors
///
/// Returns [`BuilderError::InvalidPath`] if the path is malformed.
pub fn set_map_path(target: &mut Map<String, Value>, path: &str, value: Value) -> BuilderResult<()> {
    let mut wrapped = Value::Object(std::mem::take(target));
    let result = set_path(&mut wrapped, path, value);
    if let Value::Object(map) = wrapped {
        *target = map;
    }
    result
}

/// Read the value at a dot-separated `path`, if every segment exists.
#[must_use]
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |cursor, segment| cursor.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_top_level() {
        let mut value = json!({"a": 1});
        set_path(&mut value, "b", json!(2)).expect("should set");
        assert_eq!(value, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_creates_intermediate_objects() {
        let mut value = json!({});
        set_path(&mut value, "padding.mobile.top", json!(8)).expect("should set");
        assert_eq!(value, json!({"padding": {"mobile": {"top": 8}}}));
    }

    #[test]
    fn test_replaces_scalar_intermediate() {
        let mut value = json!({"link": "old"});
        set_path(&mut value, "link.href", json!("/shop")).expect("should set");
        assert_eq!(value, json!({"link": {"href": "/shop"}}));
    }

    #[test]
    fn test_replaces_non_object_root() {
        let mut value = json!(3);
        set_path(&mut value, "a.b", json!(1)).expect("should set");
        assert_eq!(value, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_rejects_empty_segments() {
        let mut value = json!({});
        assert!(set_path(&mut value, "", json!(1)).is_err());
        assert!(set_path(&mut value, "a..b", json!(1)).is_err());
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_get_path() {
        let value = json!({"padding": {"mobile": {"top": 8}}});
        assert_eq!(get_path(&value, "padding.mobile.top"), Some(&json!(8)));
        assert!(get_path(&value, "padding.tablet").is_none());
        assert!(get_path(&value, "padding.mobile.top.x").is_none());
    }

    #[test]
    fn test_map_path() {
        let mut map = Map::new();
        set_map_path(&mut map, "link.href", json!("/")).expect("should set");
        assert_eq!(Value::Object(map), json!({"link": {"href": "/"}}));
    }
}
