//! Detection of input keys a schema does not declare.

use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::key_map::KeyMap;
use crate::types::Path;

/// Wildcard written for any array index.
const INDEX_WILDCARD: &str = "[]";

/// Finds every input path that no declared key accounts for.
///
/// Input paths are normalized by replacing indices with `[]` and compared
/// with the declared dot-notation keys. A path is accepted when it equals a
/// declared key or is a strict ancestor of one.
///
/// # Example
///
/// ```
/// use errata::{Key, KeyMap, KeyValidator};
/// use serde_json::json;
///
/// let keys = KeyMap::new(vec![
///     Key::field("name"),
///     Key::array("roles", KeyMap::new(vec![Key::field("name")])),
/// ]);
/// let validator = KeyValidator::new(&keys);
///
/// let input = json!({ "name": "Jane", "roles": [{ "name": "admin", "level": 3 }] });
/// let unexpected: Vec<String> = validator.validate(&input).iter().map(ToString::to_string).collect();
/// assert_eq!(unexpected, vec!["roles[0].level"]);
/// ```
#[derive(Debug, Clone)]
pub struct KeyValidator {
    key_paths: Vec<String>,
}

impl KeyValidator {
    pub fn new(keys: &KeyMap) -> Self {
        let mut key_paths = keys.to_dot_notation();
        key_paths.sort();
        key_paths.dedup();
        Self { key_paths }
    }

    /// Unexpected paths in `input`, in input order.
    ///
    /// Only map inputs have keys; any other input yields nothing.
    pub fn validate(&self, input: &Json) -> Vec<Path> {
        let unexpected: Vec<Path> = input_paths(input)
            .into_iter()
            .filter(|path| !self.accepts(&path.to_wildcard_notation()))
            .collect();
        debug!(unexpected = unexpected.len(), "checked input keys");
        unexpected
    }

    fn accepts(&self, candidate: &str) -> bool {
        if self.matches(candidate) {
            return true;
        }
        let mut trimmed = candidate;
        while let Some(rest) = trimmed.strip_suffix(INDEX_WILDCARD) {
            trimmed = rest;
        }
        trimmed != candidate && self.key_paths.binary_search_by(|key| key.as_str().cmp(trimmed)).is_ok()
    }

    /// True when `candidate` is a declared key or an ancestor of one.
    fn matches(&self, candidate: &str) -> bool {
        let start = self.key_paths.partition_point(|key| key.as_str() < candidate);
        self.key_paths[start..]
            .iter()
            .take_while(|key| key.starts_with(candidate))
            .any(|key| {
                let rest = &key[candidate.len()..];
                rest.is_empty() || rest.starts_with('.') || rest.starts_with('[')
            })
    }
}

/// Every leaf path of `input`.
///
/// Empty maps are leaves. Arrays are only descended into through elements
/// that are non-empty maps or arrays, keeping each element's original index;
/// an array of scalars is itself a leaf.
pub fn input_paths(input: &Json) -> Vec<Path> {
    let mut out = Vec::new();
    if let Json::Object(map) = input {
        walk_object(map, &Path::root(), &mut out);
    }
    out
}

fn walk_object(map: &Map<String, Json>, prefix: &Path, out: &mut Vec<Path>) {
    for (key, value) in map {
        walk_value(value, prefix.join(key.as_str()), out);
    }
}

fn walk_value(value: &Json, path: Path, out: &mut Vec<Path>) {
    match value {
        Json::Object(map) if !map.is_empty() => walk_object(map, &path, out),
        Json::Array(items) if items.iter().any(is_nested) => {
            for (index, item) in items.iter().enumerate().filter(|(_, item)| is_nested(item)) {
                walk_value(item, path.join(index), out);
            }
        }
        Json::Null | Json::Bool(_) | Json::Number(_) | Json::String(_) | Json::Array(_) | Json::Object(_) => {
            out.push(path);
        }
    }
}

fn is_nested(value: &Json) -> bool {
    match value {
        Json::Object(map) => !map.is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Null | Json::Bool(_) | Json::Number(_) | Json::String(_) => false,
    }
}
